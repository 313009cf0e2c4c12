//! Composed charger handle and capability views
//!
//! One physical driver serves multiple hardware tiers without caller-side
//! branching: the handle exposes exactly the operations the prober found
//! present. An unsupported operation is not an error-returning stub, it is
//! simply absent, the accessor returns `None` and the operation cannot be
//! invoked at all.

use crate::diagnostics::Diagnostics;
use crate::driver::ChargerCore;
use crate::probe::detect_legacy;
use crate::registers::{LEGACY_LAYOUT, MODERN_LAYOUT};
use evse_core::{
    AlwaysAuthorized, AuthorizationGate, CapabilitySet, ChargeStatus, EvseError, EvseResult,
};
use evse_transport::{ModbusTcpSettings, ModbusTcpTransport, RegisterTransport};
use std::time::Duration;

/// Composed handle for one charge controller
///
/// The capability set is determined exactly once during [`Charger::new`]
/// and never re-evaluated; the handle does not exist until probing
/// completes, so no readiness race is possible.
pub struct Charger<T: RegisterTransport> {
    core: ChargerCore<T>,
    caps: CapabilitySet,
}

impl<T: RegisterTransport> Charger<T> {
    /// Construct a charger over an already-connected transport
    ///
    /// Detects the register layout, probes capabilities, and returns the
    /// composed handle. `initial_current` seeds the cached current limit
    /// written back on re-enable.
    ///
    /// # Errors
    /// Fails with [`EvseError::SponsorRequired`] when the gate denies
    /// authorization. Transport errors during layout detection or probing
    /// are swallowed per-trial; they only clear capability bits.
    pub async fn new(
        mut conn: T,
        gate: &dyn AuthorizationGate,
        initial_current: u16,
    ) -> EvseResult<Self> {
        if !gate.is_authorized() {
            return Err(EvseError::SponsorRequired);
        }

        let legacy = detect_legacy(&mut conn).await;
        let layout = if legacy { &LEGACY_LAYOUT } else { &MODERN_LAYOUT };
        let core = ChargerCore::new(conn, legacy, layout, initial_current);
        let caps = core.probe().await;

        Ok(Self { core, caps })
    }

    /// The probed capability set
    pub fn capabilities(&self) -> CapabilitySet {
        self.caps
    }

    /// Whether the legacy register layout is in use
    pub fn is_legacy(&self) -> bool {
        self.core.is_legacy()
    }

    /// Current charge status
    pub async fn status(&self) -> EvseResult<ChargeStatus> {
        self.core.status().await
    }

    /// Whether charging is enabled
    pub async fn enabled(&self) -> EvseResult<bool> {
        self.core.enabled().await
    }

    /// Enable or disable charging
    pub async fn set_enabled(&self, enable: bool) -> EvseResult<()> {
        self.core.set_enabled(enable).await
    }

    /// Set the charging current limit in amperes
    pub async fn set_current_limit(&self, amps: u16) -> EvseResult<()> {
        self.core.set_current_limit(amps).await
    }

    /// Best-effort diagnostic dump of the informational registers
    pub async fn diagnose(&self) -> Diagnostics {
        self.core.diagnose().await
    }

    /// Aggregate power reading, when probed capable
    pub fn power_meter(&self) -> Option<PowerMeter<'_, T>> {
        self.caps.power.then(|| PowerMeter { core: &self.core })
    }

    /// Per-phase current readings, when probed capable
    pub fn phase_currents(&self) -> Option<PhaseCurrents<'_, T>> {
        self.caps
            .phase_currents
            .then(|| PhaseCurrents { core: &self.core })
    }

    /// Per-phase voltage readings, when probed capable
    pub fn phase_voltages(&self) -> Option<PhaseVoltages<'_, T>> {
        self.caps
            .phase_voltages
            .then(|| PhaseVoltages { core: &self.core })
    }

    /// Accumulated energy reading, when probed capable
    pub fn energy_meter(&self) -> Option<EnergyMeter<'_, T>> {
        self.caps
            .total_energy
            .then(|| EnergyMeter { core: &self.core })
    }

    /// Vehicle state-of-charge reading, when probed capable
    pub fn battery(&self) -> Option<Battery<'_, T>> {
        self.caps
            .state_of_charge
            .then(|| Battery { core: &self.core })
    }

    /// Vehicle / user identification, when probed capable
    pub fn identifier(&self) -> Option<Identifier<'_, T>> {
        self.caps.identify.then(|| Identifier { core: &self.core })
    }
}

/// Aggregate active power view
pub struct PowerMeter<'a, T: RegisterTransport> {
    core: &'a ChargerCore<T>,
}

impl<T: RegisterTransport> PowerMeter<'_, T> {
    /// Present active power in W
    pub async fn current_power(&self) -> EvseResult<f64> {
        self.core.current_power().await
    }
}

/// Per-phase currents view
pub struct PhaseCurrents<'a, T: RegisterTransport> {
    core: &'a ChargerCore<T>,
}

impl<T: RegisterTransport> PhaseCurrents<'_, T> {
    /// Per-phase currents in A
    pub async fn currents(&self) -> EvseResult<[f64; 3]> {
        self.core.currents().await
    }
}

/// Per-phase voltages view
pub struct PhaseVoltages<'a, T: RegisterTransport> {
    core: &'a ChargerCore<T>,
}

impl<T: RegisterTransport> PhaseVoltages<'_, T> {
    /// Per-phase voltages in V
    pub async fn voltages(&self) -> EvseResult<[f64; 3]> {
        self.core.voltages().await
    }
}

/// Accumulated energy view
pub struct EnergyMeter<'a, T: RegisterTransport> {
    core: &'a ChargerCore<T>,
}

impl<T: RegisterTransport> EnergyMeter<'_, T> {
    /// Accumulated energy in kWh
    pub async fn total_energy(&self) -> EvseResult<f64> {
        self.core.total_energy().await
    }
}

/// Vehicle battery view
pub struct Battery<'a, T: RegisterTransport> {
    core: &'a ChargerCore<T>,
}

impl<T: RegisterTransport> Battery<'_, T> {
    /// Vehicle state of charge, 0-100
    ///
    /// May fail with [`EvseError::NotAvailable`] even though the
    /// capability is present: no smart vehicle this round, or out-of-range
    /// telemetry.
    pub async fn soc(&self) -> EvseResult<f64> {
        self.core.soc().await
    }
}

/// Identification view
pub struct Identifier<'a, T: RegisterTransport> {
    core: &'a ChargerCore<T>,
}

impl<T: RegisterTransport> Identifier<'_, T> {
    /// Vehicle or user identifier; empty means none presented
    pub async fn identify(&self) -> EvseResult<String> {
        self.core.identify().await
    }
}

/// Builder for a Modbus-TCP charger connection
///
/// ```rust,no_run
/// use evse_charger::ChargerBuilder;
///
/// # async fn connect() -> evse_core::EvseResult<()> {
/// let charger = ChargerBuilder::new("192.168.1.30:502")
///     .unit_id(255)
///     .initial_current(6)
///     .connect()
///     .await?;
/// # Ok(()) }
/// ```
pub struct ChargerBuilder {
    address: String,
    unit_id: u8,
    initial_current: u16,
    timeout: Option<Duration>,
    gate: Box<dyn AuthorizationGate>,
}

impl ChargerBuilder {
    /// Create a builder for the given "host:port" address
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            unit_id: 255,
            initial_current: 6,
            timeout: None,
            gate: Box::new(AlwaysAuthorized),
        }
    }

    /// Set the Modbus unit (slave) id
    pub fn unit_id(mut self, unit_id: u8) -> Self {
        self.unit_id = unit_id;
        self
    }

    /// Seed the cached current limit in amperes
    pub fn initial_current(mut self, amps: u16) -> Self {
        self.initial_current = amps;
        self
    }

    /// Set the per-operation transport timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the authorization gate checked at construction
    pub fn authorization(mut self, gate: impl AuthorizationGate + 'static) -> Self {
        self.gate = Box::new(gate);
        self
    }

    /// Open the transport and build the composed charger
    ///
    /// # Errors
    /// A failed connection open is fatal; so is a denied authorization
    /// gate. Individual probe failures are not.
    pub async fn connect(self) -> EvseResult<Charger<ModbusTcpTransport>> {
        let addr = self
            .address
            .parse()
            .map_err(|e| EvseError::InvalidData(format!("Invalid TCP address: {}", e)))?;
        let mut settings = ModbusTcpSettings::new(addr).with_unit_id(self.unit_id);
        if let Some(timeout) = self.timeout {
            settings = settings.with_timeout(timeout);
        }
        let mut conn = ModbusTcpTransport::new(settings);
        conn.open().await?;
        Charger::new(conn, self.gate.as_ref(), self.initial_current).await
    }
}
