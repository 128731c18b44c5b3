//! Job descriptor and result value objects
//!
//! Both types live for exactly one request/response round trip: built,
//! serialized once, consumed, discarded. Field order on the wire is fixed;
//! see the encode methods for the canonical layout.

use bytes::Bytes;
use pawl_core::{OutVariableMap, VariableMap};

use crate::codec::{WireReader, WireWriter};
use crate::error::WireError;

/// One script-execution request.
///
/// Empty script text is legal and produces a no-op execution. Variable
/// names are not validated here; legality filtering happens upstream.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobDescriptor {
    /// Source text to execute
    pub script_text: String,

    /// Route the engine's debug stream to the log
    pub debug_logging: bool,

    /// Route the engine's verbose stream to the log
    pub verbose_logging: bool,

    /// Buffer successful-stream output lines into the result
    pub collect_output: bool,

    /// Also emit output-stream lines as log events in real time
    pub log_output: bool,

    /// Pre-execution variable bindings injected into the session
    pub variables: VariableMap,

    /// Names whose values are captured after execution, in declaration order
    pub out_variable_names: Vec<String>,
}

impl JobDescriptor {
    pub fn new(script_text: impl Into<String>) -> Self {
        Self {
            script_text: script_text.into(),
            ..Default::default()
        }
    }

    /// Request capture of an output variable. A duplicate name (compared
    /// case-insensitively) collapses to the last declared spelling.
    pub fn push_out_variable(&mut self, name: impl Into<String>) {
        let name = name.into();
        self.out_variable_names
            .retain(|existing| !existing.eq_ignore_ascii_case(&name));
        self.out_variable_names.push(name);
    }

    /// Serialize for transport
    pub fn to_bytes(&self) -> Result<Bytes, WireError> {
        let mut writer = WireWriter::new();
        writer.write_string(&self.script_text);
        writer.write_bool(self.debug_logging);
        writer.write_bool(self.verbose_logging);
        writer.write_bool(self.collect_output);
        writer.write_bool(self.log_output);

        writer.write_count(self.variables.len())?;
        for (name, value) in self.variables.iter() {
            writer.write_string(name);
            writer.write_string(value);
        }

        writer.write_count(self.out_variable_names.len())?;
        for name in &self.out_variable_names {
            writer.write_string(name);
        }

        Ok(writer.into_bytes())
    }

    /// Deserialize from transport bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, WireError> {
        let mut reader = WireReader::from_slice(bytes);

        let script_text = reader.read_string()?;
        let debug_logging = reader.read_bool()?;
        let verbose_logging = reader.read_bool()?;
        let collect_output = reader.read_bool()?;
        let log_output = reader.read_bool()?;

        let count = reader.read_count()?;
        let mut variables = VariableMap::new();
        for _ in 0..count {
            let name = reader.read_string()?;
            let value = reader.read_string()?;
            variables.insert(name, value);
        }

        let count = reader.read_count()?;
        let mut out_variable_names = Vec::with_capacity(count.min(64));
        for _ in 0..count {
            out_variable_names.push(reader.read_string()?);
        }

        Ok(Self {
            script_text,
            debug_logging,
            verbose_logging,
            collect_output,
            log_output,
            variables,
            out_variable_names,
        })
    }
}

/// The outcome of one script execution.
///
/// `exit_code` is absent when the script never explicitly requested
/// termination with a code. Out-variable values are absent (not empty) when
/// the variable was never set; the wire cannot carry that distinction, so
/// decoding normalizes empty values back to absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobResult {
    pub exit_code: Option<i32>,

    /// Non-blank captured output lines, in emission order
    pub output: Vec<String>,

    /// One entry per requested out-variable name
    pub out_variables: OutVariableMap,
}

impl JobResult {
    /// Serialize for transport
    pub fn to_bytes(&self) -> Result<Bytes, WireError> {
        let mut writer = WireWriter::new();

        match self.exit_code {
            None => writer.write_u8(0),
            Some(code) => {
                writer.write_u8(1);
                writer.write_i32(code);
            }
        }

        writer.write_count(self.output.len())?;
        for line in &self.output {
            writer.write_string(line);
        }

        writer.write_count(self.out_variables.len())?;
        for (name, value) in self.out_variables.iter() {
            writer.write_string(name);
            writer.write_opt_string(value);
        }

        Ok(writer.into_bytes())
    }

    /// Deserialize from transport bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, WireError> {
        let mut reader = WireReader::from_slice(bytes);

        let exit_code = if reader.read_u8()? == 0 {
            None
        } else {
            Some(reader.read_i32()?)
        };

        let count = reader.read_count()?;
        let mut output = Vec::with_capacity(count.min(1024));
        for _ in 0..count {
            output.push(reader.read_string()?);
        }

        let count = reader.read_count()?;
        let mut out_variables = OutVariableMap::new();
        for _ in 0..count {
            let name = reader.read_string()?;
            let value = reader.read_opt_string()?;
            out_variables.set(name, value);
        }

        Ok(Self {
            exit_code,
            output,
            out_variables,
        })
    }
}
