pub mod sniff;

pub use sniff::sniff_audio;
