use clap::ValueEnum;
use simtab_naming::DataType;

#[derive(Copy, Clone, ValueEnum)]
pub(crate) enum DataTypeFlag {
    String,
    Integer,
    Float,
    Complex,
}

impl DataTypeFlag {
    pub(crate) const fn as_domain(self) -> DataType {
        match self {
            DataTypeFlag::String => DataType::String,
            DataTypeFlag::Integer => DataType::Integer,
            DataTypeFlag::Float => DataType::Float,
            DataTypeFlag::Complex => DataType::Complex,
        }
    }
}

/// `KEY=PREFIX` as given to `--where`
pub(crate) fn parse_constraint(raw: &str) -> Result<(String, String), String> {
    let (key, prefix) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=PREFIX, got '{raw}'"))?;
    if key.is_empty() {
        return Err(format!("empty key in '{raw}'"));
    }
    Ok((key.to_string(), prefix.to_string()))
}

/// A single character, or one of `tab`, `space`, `\t`
pub(crate) fn parse_delimiter(raw: &str) -> Result<char, String> {
    match raw {
        "tab" | "\\t" => return Ok('\t'),
        "space" => return Ok(' '),
        _ => {}
    }
    let mut chars = raw.chars();
    match (chars.next(), chars.next()) {
        (Some(ch), None) => Ok(ch),
        _ => Err(format!("delimiter must be one character, got '{raw}'")),
    }
}
