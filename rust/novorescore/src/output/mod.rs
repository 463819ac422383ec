pub mod feature_table;
pub mod pin;

pub use feature_table::{
    write_feature_table,
    write_feature_table_file,
};
pub use pin::{
    OutputAssembler,
    PIN_FILE_NAME,
    PinRow,
    write_pin,
    write_pin_file,
};
