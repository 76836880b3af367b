use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

/// Knobs for the trace generator, read from a `key value` config file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenConfig {
    /// output filename, sanitized to `[A-Za-z0-9_-]`
    pub name: String,
    /// number of seeding `a` commands
    pub size: u64,
    /// number of weighted commands after the seeding
    pub op: u64,
    pub addfreq: u64,
    pub decfreq: u64,
    pub popfreq: u64,
    pub minval: i64,
    pub maxval: i64,
}

impl Default for GenConfig {
    fn default() -> Self {
        GenConfig {
            name: "default".to_owned(),
            size: 1000,
            op: 1_000_000,
            addfreq: 1,
            decfreq: 8,
            popfreq: 1,
            minval: -1_000_000_000,
            maxval: 1_000_000_000,
        }
    }
}

/// raw option values as read from the file, before clamping
struct RawOptions {
    name: String,
    size: i64,
    op: i64,
    addfreq: i64,
    decfreq: i64,
    popfreq: i64,
    minval: i64,
    maxval: i64,
}

impl RawOptions {
    fn with_name(name: &str) -> Self {
        let defaults = GenConfig::default();
        RawOptions {
            name: name.to_owned(),
            size: defaults.size as i64,
            op: defaults.op as i64,
            addfreq: defaults.addfreq as i64,
            decfreq: defaults.decfreq as i64,
            popfreq: defaults.popfreq as i64,
            minval: defaults.minval,
            maxval: defaults.maxval,
        }
    }

    fn normalize(self) -> GenConfig {
        let name: String = self
            .name
            .chars()
            .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '-')
            .collect();
        let name = if name.is_empty() {
            "default".to_owned()
        } else {
            name
        };
        let size = self.size.max(0) as u64;
        let mut op = self.op.max(0) as u64;
        if size == 0 && op == 0 {
            op = 1;
        }
        let mut addfreq = self.addfreq.max(0) as u64;
        let mut decfreq = self.decfreq.max(0) as u64;
        let mut popfreq = self.popfreq.max(0) as u64;
        if addfreq + decfreq + popfreq == 0 {
            addfreq = 1;
            decfreq = 1;
            popfreq = 1;
        }
        GenConfig {
            name,
            size,
            op,
            addfreq,
            decfreq,
            popfreq,
            minval: self.minval.min(self.maxval),
            maxval: self.maxval,
        }
    }
}

/// Reads a generator config file. Keys are case-insensitive; unknown keys
/// and unparseable values keep their defaults. The `name` defaults to the
/// config file's own name.
pub fn read_config(path: &Path) -> io::Result<GenConfig> {
    let fallback = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let file = File::open(path)?;
    parse_config(BufReader::new(file), &fallback)
}

/// Parses config lines from any reader; `fallback_name` is used when the
/// file does not set `name`.
pub fn parse_config<R: BufRead>(input: R, fallback_name: &str) -> io::Result<GenConfig> {
    let mut raw = RawOptions::with_name(fallback_name);
    for line in input.lines() {
        let line = line?.to_lowercase();
        let mut params = line.split_whitespace();
        let (key, value) = match (params.next(), params.next()) {
            (Some(key), Some(value)) => (key, value),
            _ => continue,
        };
        match key {
            "name" => raw.name = value.to_owned(),
            "size" => raw.size = value.parse().unwrap_or(raw.size),
            "op" => raw.op = value.parse().unwrap_or(raw.op),
            "addfreq" => raw.addfreq = value.parse().unwrap_or(raw.addfreq),
            "decfreq" => raw.decfreq = value.parse().unwrap_or(raw.decfreq),
            "popfreq" => raw.popfreq = value.parse().unwrap_or(raw.popfreq),
            "minval" => raw.minval = value.parse().unwrap_or(raw.minval),
            "maxval" => raw.maxval = value.parse().unwrap_or(raw.maxval),
            _ => {}
        }
    }
    Ok(raw.normalize())
}
