//! Java language level + version-gated method feature model.
//!
//! Semantic checks never compare release numbers directly; they ask the language level
//! whether a [`JavaFeature`] is in effect.

use serde::{Deserialize, Serialize};

/// The effective Java language mode for a compilation.
///
/// - `major`: the Java feature release number (8, 11, 17, 21, …)
/// - `preview`: whether `--enable-preview` is in effect for this major version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct JavaLanguageLevel {
    pub major: u16,
    pub preview: bool,
}

impl JavaLanguageLevel {
    pub const JAVA_8: Self = Self {
        major: 8,
        preview: false,
    };
    pub const JAVA_9: Self = Self {
        major: 9,
        preview: false,
    };
    pub const JAVA_11: Self = Self {
        major: 11,
        preview: false,
    };
    pub const JAVA_17: Self = Self {
        major: 17,
        preview: false,
    };
    pub const JAVA_21: Self = Self {
        major: 21,
        preview: false,
    };

    pub const fn new(major: u16) -> Self {
        Self {
            major,
            preview: false,
        }
    }

    #[inline]
    pub const fn with_preview(self, preview: bool) -> Self {
        Self { preview, ..self }
    }

    pub fn availability(self, feature: JavaFeature) -> FeatureAvailability {
        match feature.stable_since() {
            Some(since) if self.major >= since => FeatureAvailability::Stable,
            _ => FeatureAvailability::Unavailable,
        }
    }

    /// Is the feature in effect in this configuration?
    ///
    /// Method features are never preview-only, so the `preview` flag does not unlock them.
    pub fn is_enabled(self, feature: JavaFeature) -> bool {
        self.availability(feature) == FeatureAvailability::Stable
    }

    #[inline]
    pub fn supports_private_interface_methods(self) -> bool {
        self.is_enabled(JavaFeature::PrivateInterfaceMethods)
    }

    /// From 17 on all floating point is strict and `strictfp` is redundant.
    #[inline]
    pub fn strictfp_is_redundant(self) -> bool {
        self.is_enabled(JavaFeature::AlwaysStrictFloatingPoint)
    }
}

impl Default for JavaLanguageLevel {
    fn default() -> Self {
        JavaLanguageLevel::JAVA_21
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JavaFeature {
    PrivateInterfaceMethods,   // Java 9+
    AlwaysStrictFloatingPoint, // Java 17+ (JEP 306)
}

impl JavaFeature {
    pub const fn stable_since(self) -> Option<u16> {
        match self {
            JavaFeature::PrivateInterfaceMethods => Some(9),
            JavaFeature::AlwaysStrictFloatingPoint => Some(17),
        }
    }
}

/// Whether the *language* supports a feature in this major version,
/// independent of whether preview is enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeatureAvailability {
    Unavailable,
    Stable,
}
