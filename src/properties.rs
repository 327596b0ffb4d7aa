use std::{collections::HashMap, fs::File, io::BufReader, path::Path};

use thiserror::Error;

use crate::{error::CodecError, fgk::{self, CodecConfig}};

#[derive(Debug, Error)]
pub enum PropertiesError {
    #[error("could not read the properties file")]
    Io(#[from] std::io::Error),
    #[error("malformed properties file")]
    Parse(#[from] java_properties::PropertiesError),
    #[error("invalid value {value:?} for key {key}")]
    InvalidValue { key: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Properties {
    /// `None` lets the sentinel be chosen from the payload.
    pub sentinel: Option<u8>,
    pub verify_invariants: bool,
    pub compressed_output: String,
    pub decoded_output: String,
}

impl Default for Properties {
    fn default() -> Self {
        Self {
            sentinel: None,
            verify_invariants: false,
            compressed_output: "compr_fgk.dat".to_string(),
            decoded_output: "orig_fgk.txt".to_string(),
        }
    }
}

impl Properties {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, PropertiesError> {
        let file = File::open(path)?;
        let map = java_properties::read(BufReader::new(file))?;
        Self::try_from(map)
    }

    pub fn codec_config(&self, payload: &[u8]) -> Result<CodecConfig, CodecError> {
        Ok(CodecConfig {
            sentinel: fgk::choose_sentinel(payload, self.sentinel)?,
            verify_invariants: self.verify_invariants,
        })
    }
}

fn parse_byte(value: &str) -> Option<u8> {
    let value = value.trim();
    match value.strip_prefix("0x").or_else(|| value.strip_prefix("0X")) {
        Some(hex) => u8::from_str_radix(hex, 16).ok(),
        None => value.parse().ok(),
    }
}

impl TryFrom<HashMap<String, String>> for Properties {
    type Error = PropertiesError;

    fn try_from(value: HashMap<String, String>) -> Result<Self, Self::Error> {
        let mut props = Properties::default();

        if let Some(sentinel) = value.get("sentinel") {
            props.sentinel = Some(parse_byte(sentinel)
                .ok_or_else(|| PropertiesError::InvalidValue { key: "sentinel", value: sentinel.clone() })?);
        }
        if let Some(verify) = value.get("verifyinvariants") {
            props.verify_invariants = verify.trim().parse()
                .map_err(|_| PropertiesError::InvalidValue { key: "verifyinvariants", value: verify.clone() })?;
        }
        if let Some(output) = value.get("compressedoutput") {
            props.compressed_output = output.trim().to_string();
        }
        if let Some(output) = value.get("decodedoutput") {
            props.decoded_output = output.trim().to_string();
        }

        Ok(props)
    }
}

impl From<Properties> for String {
    fn from(val: Properties) -> Self {
        let mut s = String::new();

        s.push_str("#FGK properties\n");
        if let Some(sentinel) = val.sentinel {
            s.push_str(&format!("sentinel={:#04x}\n", sentinel));
        }
        s.push_str(&format!("verifyinvariants={}\n", val.verify_invariants));
        s.push_str(&format!("compressedoutput={}\n", val.compressed_output));
        s.push_str(&format!("decodedoutput={}\n", val.decoded_output));

        s
    }
}
