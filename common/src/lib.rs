pub mod models;
pub mod smiles;
