pub mod function_mask;
pub mod matrix;
pub mod module_matrix;
pub mod point;
pub mod qr_code;

pub use function_mask::FunctionMask;
pub use matrix::BitMatrix;
pub use module_matrix::ModuleMatrix;
pub use point::Point;
pub use qr_code::{DecodedSymbol, ECLevel, EncodedSymbol, MaskPattern, Mode, Version};
