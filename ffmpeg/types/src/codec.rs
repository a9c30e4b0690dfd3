/*!
    Codec identifiers.
*/

/**
    Video codecs that can be requested when encoding.
*/
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CodecId {
    H264,
    H265,
    Vp8,
    Vp9,
    Av1,
    Mpeg4,
    Mpeg2Video,
    Mjpeg,
    Png,
    RawVideo,
}
