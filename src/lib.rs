pub mod bitstreams;
pub mod error;
pub mod fgk;
pub mod generator;
pub mod huffman;
pub mod properties;
pub mod report;

pub use error::{CodecError, TreeError};
pub use fgk::{compress, decompress, CodecConfig, END_OF_TEXT};
pub use properties::Properties;
