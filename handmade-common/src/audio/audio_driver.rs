use handmade_core::sink::SoundBuffer;

pub trait AudioDriver {
    type Buffer: SoundBuffer;

    fn sound_buffer(&self) -> Self::Buffer;
    fn sample_rate(&self) -> u32;
}
