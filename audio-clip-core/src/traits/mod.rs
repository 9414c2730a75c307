pub mod clip_delegate;
pub mod frame_source;
