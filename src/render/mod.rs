pub mod cues;
pub mod renderer;

pub use cues::{CuePlayer, SoundCue};
pub use renderer::{RenderOptions, Renderer};
