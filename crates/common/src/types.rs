use serde::{Deserialize, Serialize};

/// Frame rate that per-frame increments are tuned against.
pub const REFERENCE_FRAME_RATE: f32 = 60.0;

/// Stable handle to a node in a scene arena.
///
/// The generation is bumped every time a slot is reused, so a handle to a
/// removed node never resolves to whatever took its place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId {
    pub index: u32,
    pub generation: u32,
}

impl NodeId {
    pub const fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}v{}", self.index, self.generation)
    }
}

/// How many reference frames a single update covers.
///
/// Animators and controllers express their increments per reference frame.
/// A fixed-step driver passes [`FrameStep::ONE`] and reproduces the flat
/// per-call increments; a variable-step driver passes
/// [`FrameStep::from_elapsed`] so motion stays frame-rate independent.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct FrameStep(pub f32);

impl FrameStep {
    pub const ONE: Self = Self(1.0);

    /// Step covering `seconds` of wall time at [`REFERENCE_FRAME_RATE`].
    pub fn from_elapsed(seconds: f32) -> Self {
        Self(seconds.max(0.0) * REFERENCE_FRAME_RATE)
    }

    /// Scale a per-frame increment by this step.
    pub fn scale(self, per_frame: f32) -> f32 {
        per_frame * self.0
    }

    pub fn frames(self) -> f32 {
        self.0
    }
}

impl Default for FrameStep {
    fn default() -> Self {
        Self::ONE
    }
}
