/// Abstracts driving and floating the shared bus lines.
///
/// `create` moves the lines out of their neutral, high-impedance state into
/// an actively driven bus with the local chip-select as an output. `recover`
/// must leave every line as an input again once the bus has been dropped.
pub trait BusFactory {
    /// The driven bus handed to units of work while the bus is held.
    type Bus;
    /// The neutral pins (and peripheral) held while the bus is released.
    type Resources;
    /// Opaque token that can reconstruct [`Resources`](Self::Resources) after the bus is dropped.
    type Destructor;
    /// Error type for bus creation failures.
    type Error: core::fmt::Debug;

    /// Drive the bus from the given resources.
    ///
    /// On failure, returns the error **and** the original resources so the
    /// lines stay neutral and the arbiter can try again later.
    fn create(
        resources: Self::Resources,
    ) -> Result<(Self::Bus, Self::Destructor), (Self::Error, Self::Resources)>;

    /// Recover the neutral resources from a destructor token.
    fn recover(destructor: Self::Destructor) -> Self::Resources;
}
