// Re-export all model types
pub use self::enums::*;
pub use self::errors::*;
pub use self::food::*;
pub use self::order::*;
pub use self::validation::*;

mod enums;
mod errors;
mod food;
mod order;
mod validation;
