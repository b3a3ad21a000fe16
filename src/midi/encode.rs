use super::decode::MidiChannel;

/// Velocity used when the on-screen keyboard echoes a tap to a device.
pub const DEFAULT_VELOCITY: u8 = 100;

pub fn note_on_bytes(channel: MidiChannel, note: u8, velocity: u8) -> [u8; 3] {
    [0x90 | channel.index(), note & 0x7F, velocity & 0x7F]
}

pub fn note_off_bytes(channel: MidiChannel, note: u8) -> [u8; 3] {
    [0x80 | channel.index(), note & 0x7F, 0]
}
