//! Algorithms that search for local minima of functions along multiple dimensions.

mod nelder_mead;

pub use self::nelder_mead::nelder_mead;
pub use self::nelder_mead::Contraction;
pub use self::nelder_mead::NelderMead;
pub use self::nelder_mead::NelderMeadBuilder;
pub use self::nelder_mead::NelderMeadBuilderError;
