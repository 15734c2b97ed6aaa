pub mod field;

pub use field::FieldElement;
