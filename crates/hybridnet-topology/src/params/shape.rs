//! Compute shape catalog.
//!
//! A shape descriptor has the form `family.size` (for example `t3.micro`).
//! Only combinations of a known family and a known size are accepted.

use std::fmt;

use hybridnet_common::constants::SHAPE_DELIMITER;
use serde::{Serialize, Serializer};

/// Instance family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeFamily {
    /// Burstable, Intel.
    T3,
    /// Burstable, AMD.
    T3a,
    /// General purpose.
    M5,
    /// General purpose, newer generation.
    M6i,
    /// Compute optimized.
    C5,
    /// Memory optimized.
    R5,
}

impl ShapeFamily {
    const ALL: [Self; 6] = [Self::T3, Self::T3a, Self::M5, Self::M6i, Self::C5, Self::R5];

    const fn token(self) -> &'static str {
        match self {
            Self::T3 => "t3",
            Self::T3a => "t3a",
            Self::M5 => "m5",
            Self::M6i => "m6i",
            Self::C5 => "c5",
            Self::R5 => "r5",
        }
    }

    fn from_token(token: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.token() == token)
    }
}

/// Instance size within a family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeSize {
    /// `nano`
    Nano,
    /// `micro`
    Micro,
    /// `small`
    Small,
    /// `medium`
    Medium,
    /// `large`
    Large,
    /// `xlarge`
    Xlarge,
    /// `2xlarge`
    Xlarge2,
}

impl ShapeSize {
    const ALL: [Self; 7] = [
        Self::Nano,
        Self::Micro,
        Self::Small,
        Self::Medium,
        Self::Large,
        Self::Xlarge,
        Self::Xlarge2,
    ];

    const fn token(self) -> &'static str {
        match self {
            Self::Nano => "nano",
            Self::Micro => "micro",
            Self::Small => "small",
            Self::Medium => "medium",
            Self::Large => "large",
            Self::Xlarge => "xlarge",
            Self::Xlarge2 => "2xlarge",
        }
    }

    fn from_token(token: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.token() == token)
    }
}

/// A validated `family.size` compute shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Shape {
    /// Instance family.
    pub family: ShapeFamily,
    /// Instance size.
    pub size: ShapeSize,
}

impl Shape {
    /// Parses a descriptor, returning `None` unless it splits into exactly
    /// two catalog tokens.
    #[must_use]
    pub fn parse(descriptor: &str) -> Option<Self> {
        let mut tokens = descriptor.trim().split(SHAPE_DELIMITER);
        let family = ShapeFamily::from_token(tokens.next()?)?;
        let size = ShapeSize::from_token(tokens.next()?)?;
        if tokens.next().is_some() {
            return None;
        }
        Some(Self { family, size })
    }
}

impl Default for Shape {
    /// `t3.micro`
    fn default() -> Self {
        Self {
            family: ShapeFamily::T3,
            size: ShapeSize::Micro,
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{SHAPE_DELIMITER}{}",
            self.family.token(),
            self.size.token()
        )
    }
}

impl Serialize for Shape {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use hybridnet_common::constants::DEFAULT_SHAPE;

    use super::*;

    #[test]
    fn parses_known_descriptor() {
        let shape = Shape::parse("m6i.2xlarge").expect("known shape");
        assert_eq!(shape.family, ShapeFamily::M6i);
        assert_eq!(shape.size, ShapeSize::Xlarge2);
        assert_eq!(shape.to_string(), "m6i.2xlarge");
    }

    #[test]
    fn default_matches_constant() {
        assert_eq!(Shape::default().to_string(), DEFAULT_SHAPE);
    }

    #[test]
    fn rejects_unknown_tokens() {
        assert!(Shape::parse("z9.micro").is_none());
        assert!(Shape::parse("t3.gigantic").is_none());
    }

    #[test]
    fn rejects_wrong_token_count() {
        assert!(Shape::parse("t3").is_none());
        assert!(Shape::parse("t3.micro.extra").is_none());
        assert!(Shape::parse("").is_none());
    }

    #[test]
    fn serializes_as_descriptor() {
        let json = serde_json::to_string(&Shape::default()).expect("serialize");
        assert_eq!(json, "\"t3.micro\"");
    }
}
