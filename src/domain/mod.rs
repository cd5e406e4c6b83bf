// Domain layer - Style model, error taxonomy and classification rules

pub mod errors;
pub mod model;
pub mod rules;
