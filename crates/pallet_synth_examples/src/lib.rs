#![forbid(unsafe_code)]

mod support;

pub use support::{
    init_tracing, load_rgb8, procedural_wood_rgb8, save_rgb8_png, save_texture_png, ReferenceImage,
};
