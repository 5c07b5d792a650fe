pub mod connection;
pub mod index;
pub mod invariants;
pub mod pipeline;
pub mod ricci;
pub mod riemann;
pub mod tensor;

pub use connection::{
    christoffel_array, christoffel_component, connection_derivatives, metric_derivatives,
};
pub use index::{lower_first_index, raise_last_three, RaiseStrategy};
pub use invariants::kretschmann_scalar;
pub use pipeline::{CurvaturePipeline, CurvatureTensors};
pub use ricci::{
    contract_riemann, ricci_array, ricci_array_from, ricci_component, ricci_component_with,
    RicciConvention,
};
pub use riemann::{riemann_array, riemann_array_from, riemann_component, riemann_tensor};
pub use tensor::{build_tensor, nonzero_components, simplify_array, Execution};
