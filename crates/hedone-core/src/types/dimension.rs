//! Canonical Dimension enumeration for the 16-axis pleasure space.
//!
//! This module defines the SINGLE source of truth for the pleasure axes.
//! All vector code interprets a 16-length numeric array in this fixed
//! order; no other ordering exists anywhere in the system.
//!
//! # Ordering
//!
//! Variant values (0-15) are STABLE and used for array indexing.
//! DO NOT reorder or renumber variants: historical embeddings were
//! written against these offsets.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The 16 fixed semantic axes of the pleasure space.
///
/// Each axis names one recurring texture of experience a session can touch.
/// Dimensions form an immutable closed enumeration; the numeric discriminant
/// is the array offset for the dense embedding representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum Dimension {
    /// Arranging, sorting, tidying; pleasure of imposed structure.
    Order = 0,
    /// Small bounded spaces, nooks, shelter.
    Enclosure = 1,
    /// Following a route for its own sake.
    Path = 2,
    /// Long sight-lines, vistas, open sky.
    Horizon = 3,
    /// Controlled unease; thrill at the edge of comfort.
    Anxiety = 4,
    /// Deliberate not-knowing; withholding the answer.
    Ignorance = 5,
    /// Loops, rhythms, ritualized redoing.
    Repetition = 6,
    /// Sending and receiving; messages, mail, dispatches.
    Post = 7,
    /// Taste, cooking, sharing food.
    Food = 8,
    /// Being in motion; transit as its own reward.
    Mobility = 9,
    /// Charged ambiguity in attraction.
    EroticUncertainty = 10,
    /// Hands-on manipulation of stuff and texture.
    MaterialPlay = 11,
    /// Exercising or yielding control.
    Power = 12,
    /// Recognizing oneself in the natural world.
    NatureMirror = 13,
    /// Surrendering direction to chance encounters.
    SerendipityFollowing = 14,
    /// Growing outward from a fixed home base.
    AnchorExpansion = 15,
}

impl Dimension {
    /// Total number of dimensions in the space.
    pub const COUNT: usize = 16;

    /// Get the array index for this dimension (0-15).
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Create a dimension from an array index.
    ///
    /// Returns `None` if index >= 16.
    #[inline]
    pub fn from_index(idx: usize) -> Option<Self> {
        match idx {
            0 => Some(Self::Order),
            1 => Some(Self::Enclosure),
            2 => Some(Self::Path),
            3 => Some(Self::Horizon),
            4 => Some(Self::Anxiety),
            5 => Some(Self::Ignorance),
            6 => Some(Self::Repetition),
            7 => Some(Self::Post),
            8 => Some(Self::Food),
            9 => Some(Self::Mobility),
            10 => Some(Self::EroticUncertainty),
            11 => Some(Self::MaterialPlay),
            12 => Some(Self::Power),
            13 => Some(Self::NatureMirror),
            14 => Some(Self::SerendipityFollowing),
            15 => Some(Self::AnchorExpansion),
            _ => None,
        }
    }

    /// Iterate over all dimensions in fixed enumeration order.
    pub fn all() -> impl ExactSizeIterator<Item = Dimension> {
        (0..Self::COUNT).map(|i| Self::from_index(i).expect("index in range"))
    }

    /// Get the canonical wire name for this dimension.
    ///
    /// This is the snake_case name used in persisted activation maps and
    /// echoed back by the AI rendering collaborator as dimension tags.
    pub fn name(self) -> &'static str {
        match self {
            Self::Order => "order",
            Self::Enclosure => "enclosure",
            Self::Path => "path",
            Self::Horizon => "horizon",
            Self::Anxiety => "anxiety",
            Self::Ignorance => "ignorance",
            Self::Repetition => "repetition",
            Self::Post => "post",
            Self::Food => "food",
            Self::Mobility => "mobility",
            Self::EroticUncertainty => "erotic_uncertainty",
            Self::MaterialPlay => "material_play",
            Self::Power => "power",
            Self::NatureMirror => "nature_mirror",
            Self::SerendipityFollowing => "serendipity_following",
            Self::AnchorExpansion => "anchor_expansion",
        }
    }

    /// Resolve free text back to a dimension.
    ///
    /// The AI collaborator returns dimension names as free text; this is the
    /// exhaustive string -> Dimension lookup for matching them back to the
    /// closed enumeration. Matching is ASCII case-insensitive on the
    /// canonical wire name. Unmatched text returns `None` and is simply not
    /// tagged; it is never an error.
    pub fn from_name(name: &str) -> Option<Self> {
        let lowered = name.trim().to_ascii_lowercase();
        match lowered.as_str() {
            "order" => Some(Self::Order),
            "enclosure" => Some(Self::Enclosure),
            "path" => Some(Self::Path),
            "horizon" => Some(Self::Horizon),
            "anxiety" => Some(Self::Anxiety),
            "ignorance" => Some(Self::Ignorance),
            "repetition" => Some(Self::Repetition),
            "post" => Some(Self::Post),
            "food" => Some(Self::Food),
            "mobility" => Some(Self::Mobility),
            "erotic_uncertainty" => Some(Self::EroticUncertainty),
            "material_play" => Some(Self::MaterialPlay),
            "power" => Some(Self::Power),
            "nature_mirror" => Some(Self::NatureMirror),
            "serendipity_following" => Some(Self::SerendipityFollowing),
            "anchor_expansion" => Some(Self::AnchorExpansion),
            _ => None,
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
