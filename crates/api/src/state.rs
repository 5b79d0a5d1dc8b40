//! Shared application state.

use carrier_store::CarrierStore;
use quoting::{CarrierSimulator, CostAggregator, HttpCarrierClient, RequestValidator};

/// Shared application state accessible from all handlers.
pub struct AppState<S: CarrierStore> {
    pub carriers: S,
    pub validator: RequestValidator,
    pub aggregator: CostAggregator<S, HttpCarrierClient>,
    pub simulator: CarrierSimulator,
}

impl<S: CarrierStore + Clone> AppState<S> {
    /// Builds the state; the aggregator reads from the same directory.
    pub fn new(
        carriers: S,
        client: HttpCarrierClient,
        validator: RequestValidator,
        simulator: CarrierSimulator,
    ) -> Self {
        Self {
            aggregator: CostAggregator::new(carriers.clone(), client),
            carriers,
            validator,
            simulator,
        }
    }
}
