use std::net::Ipv4Addr;

use chrono::{DateTime, SecondsFormat, Utc};
use rand::Rng;
use rand::distributions::Alphanumeric;
use rand::seq::SliceRandom;

use crate::ir::ExampleValue;

use super::schema_resolver::{LeafConstraints, SchemaKind};

const DEFAULT_MINIMUM: i64 = 0;
const DEFAULT_MAXIMUM: i64 = 100;
/// Exclusive upper bound on the length of free-form example strings.
const MAX_FREE_STRING_LEN: usize = 15;
/// Latest generated timestamp: 2100-01-01T00:00:00Z.
const MAX_TIMESTAMP: i64 = 4_102_444_800;

/// String formats with a dedicated generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExampleFormat {
    DateTime,
    Date,
    Uuid,
    Ipv4,
    CidrBlock,
    MacAddress,
    Email,
}

impl ExampleFormat {
    pub fn parse(format: &str) -> Option<Self> {
        match format {
            "date-time" => Some(ExampleFormat::DateTime),
            "date" => Some(ExampleFormat::Date),
            "uuid" => Some(ExampleFormat::Uuid),
            "ip" | "ipv4" | "address-or-block-or-range" => Some(ExampleFormat::Ipv4),
            "ip-cidr-block" => Some(ExampleFormat::CidrBlock),
            "mac-address" => Some(ExampleFormat::MacAddress),
            "email" => Some(ExampleFormat::Email),
            _ => None,
        }
    }
}

/// Produces leaf example values from an injected random source.
///
/// With examples disabled every value is a fixed zero value and the random
/// source is never touched, so output is reproducible.
#[derive(Debug)]
pub struct Synthesizer<R> {
    rng: R,
    generate_examples: bool,
}

impl<R: Rng> Synthesizer<R> {
    pub fn new(rng: R, generate_examples: bool) -> Self {
        Self {
            rng,
            generate_examples,
        }
    }

    /// One representative value for a leaf schema.
    pub fn synthesize(&mut self, leaf: &LeafConstraints<'_>) -> ExampleValue {
        match leaf.kind {
            SchemaKind::String => self.string(leaf),
            SchemaKind::Integer => self.integer(leaf),
            SchemaKind::Boolean => ExampleValue::Boolean(false),
            _ => ExampleValue::Null,
        }
    }

    pub fn string(&mut self, leaf: &LeafConstraints<'_>) -> ExampleValue {
        if !self.generate_examples {
            return ExampleValue::String(String::new());
        }
        if let Some(choice) = leaf.enum_values.choose(&mut self.rng) {
            return ExampleValue::String(enum_literal(choice));
        }
        let text = match leaf.format.and_then(ExampleFormat::parse) {
            Some(format) => self.formatted(format),
            None => self.free_string(),
        };
        ExampleValue::String(text)
    }

    /// An enum member when one is declared, else inclusive
    /// `[minimum, maximum]`, defaulting to `[0, 100]`.
    pub fn integer(&mut self, leaf: &LeafConstraints<'_>) -> ExampleValue {
        let minimum = leaf.minimum.map_or(DEFAULT_MINIMUM, |m| m as i64);
        if !self.generate_examples {
            return ExampleValue::Integer(minimum);
        }
        if let Some(choice) = leaf.enum_values.choose(&mut self.rng) {
            return match choice.as_i64() {
                Some(n) => ExampleValue::Integer(n),
                None => ExampleValue::String(enum_literal(choice)),
            };
        }
        let maximum = leaf.maximum.map_or(DEFAULT_MAXIMUM, |m| m as i64);
        if maximum <= minimum {
            return ExampleValue::Integer(minimum);
        }
        ExampleValue::Integer(self.rng.gen_range(minimum..=maximum))
    }

    fn formatted(&mut self, format: ExampleFormat) -> String {
        match format {
            ExampleFormat::DateTime => self.timestamp().to_rfc3339_opts(SecondsFormat::Secs, true),
            ExampleFormat::Date => self.timestamp().date_naive().to_string(),
            ExampleFormat::Uuid => {
                let mut bytes = [0u8; 16];
                self.rng.fill_bytes(&mut bytes);
                uuid::Builder::from_random_bytes(bytes)
                    .into_uuid()
                    .to_string()
            }
            ExampleFormat::Ipv4 => self.ipv4().to_string(),
            ExampleFormat::CidrBlock => {
                let prefix: u8 = self.rng.gen_range(20..=32);
                format!("{}/{}", self.ipv4(), prefix)
            }
            ExampleFormat::MacAddress => {
                let mut bytes = [0u8; 6];
                self.rng.fill_bytes(&mut bytes);
                bytes
                    .iter()
                    .map(|b| format!("{b:02x}"))
                    .collect::<Vec<_>>()
                    .join(":")
            }
            ExampleFormat::Email => {
                let len = self.rng.gen_range(3..MAX_FREE_STRING_LEN);
                let user: String = (&mut self.rng)
                    .sample_iter(Alphanumeric)
                    .take(len)
                    .map(char::from)
                    .collect();
                format!("{}@example.com", user.to_lowercase())
            }
        }
    }

    fn free_string(&mut self) -> String {
        let len = self.rng.gen_range(0..MAX_FREE_STRING_LEN);
        (&mut self.rng)
            .sample_iter(Alphanumeric)
            .take(len)
            .map(char::from)
            .collect()
    }

    fn ipv4(&mut self) -> Ipv4Addr {
        Ipv4Addr::from(self.rng.next_u32())
    }

    fn timestamp(&mut self) -> DateTime<Utc> {
        let secs = self.rng.gen_range(0..MAX_TIMESTAMP);
        DateTime::from_timestamp(secs, 0).unwrap_or_default()
    }
}

/// Enum members are emitted as text; non-string literals keep their JSON form.
fn enum_literal(value: &serde_json::Value) -> String {
    match value.as_str() {
        Some(s) => s.to_string(),
        None => value.to_string(),
    }
}
