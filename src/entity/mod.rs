//! SeaORM entity definitions.

pub mod test_data;
