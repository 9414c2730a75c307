pub mod quantizer;
pub mod region_editor;
pub mod sample_buffer;
pub mod wav_format;
