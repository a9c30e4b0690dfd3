/*!
    Source configuration.
*/

use ffmpeg_types::PixelFormat;

use crate::ScalingAlgorithm;

/**
    Configuration for opening a media source.
*/
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceConfig {
    /// Pixel format every produced frame is converted to.
    pub pixel_format: PixelFormat,
    /// Algorithm used when the decoder output has to be converted.
    pub scaling: ScalingAlgorithm,
}

impl SourceConfig {
    /**
        Create a configuration producing frames in the given pixel format.
    */
    pub fn new(pixel_format: PixelFormat) -> Self {
        Self {
            pixel_format,
            scaling: ScalingAlgorithm::default(),
        }
    }

    /**
        Set the scaling algorithm.
    */
    pub fn with_scaling(mut self, scaling: ScalingAlgorithm) -> Self {
        self.scaling = scaling;
        self
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self::new(PixelFormat::Rgb24)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_rgb() {
        let config = SourceConfig::default();
        assert_eq!(config.pixel_format, PixelFormat::Rgb24);
        assert_eq!(config.scaling, ScalingAlgorithm::Bilinear);
    }

    #[test]
    fn with_scaling_overrides_algorithm() {
        let config = SourceConfig::new(PixelFormat::Gray8).with_scaling(ScalingAlgorithm::Lanczos);
        assert_eq!(config.pixel_format, PixelFormat::Gray8);
        assert_eq!(config.scaling, ScalingAlgorithm::Lanczos);
    }
}
