use std::{
    fmt::{Display, Formatter},
    num::{NonZeroU32, ParseIntError},
    str::FromStr,
};
use thiserror::Error;

pub const IMAGE_ASSET_REF_PREFIX: &str = "image-";

#[derive(Clone, Eq, PartialEq, Debug, Error)]
pub enum ImageAssetRefDecodeError {
    #[error("Asset reference does not start with {IMAGE_ASSET_REF_PREFIX:?}")]
    NotAnImage,
    #[error("Not enough parts separated by '-'")]
    NotEnoughParts,
    #[error("Dimensions are not of the form <width>x<height>")]
    MalformedDimensions,
    #[error("Invalid dimension: {0}")]
    InvalidDimension(#[from] ParseIntError),
    #[error("The asset id is empty")]
    EmptyId,
    #[error("The file format is empty")]
    EmptyFormat,
}

/// Reference to an image asset, like `image-Tb9Ew8CXIwaY6R1kjMvI0uRR-2000x3000-jpg`.
#[derive(Clone, Eq, PartialEq, Debug, Hash)]
pub struct ImageAssetRef {
    pub id: String,
    pub width: NonZeroU32,
    pub height: NonZeroU32,
    pub format: String,
}

/// Fractions of the source image cut away from each edge.
#[derive(Copy, Clone, PartialEq, Debug, Default)]
pub struct ImageCrop {
    pub top: f64,
    pub bottom: f64,
    pub left: f64,
    pub right: f64,
}

#[derive(Clone, PartialEq, Debug)]
pub struct Image {
    pub asset: ImageAssetRef,
    pub crop: Option<ImageCrop>,
    pub alt: Option<String>,
}

impl ImageCrop {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.top == 0.0 && self.bottom == 0.0 && self.left == 0.0 && self.right == 0.0
    }
}

impl FromStr for ImageAssetRef {
    type Err = ImageAssetRefDecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rest = s
            .strip_prefix(IMAGE_ASSET_REF_PREFIX)
            .ok_or(Self::Err::NotAnImage)?;

        let mut parts = rest.rsplitn(3, '-');

        let format = parts.next().ok_or(Self::Err::NotEnoughParts)?;
        let dimensions = parts.next().ok_or(Self::Err::NotEnoughParts)?;
        let id = parts.next().ok_or(Self::Err::NotEnoughParts)?;

        if id.is_empty() {
            return Err(Self::Err::EmptyId);
        }
        if format.is_empty() {
            return Err(Self::Err::EmptyFormat);
        }

        let (width, height) = dimensions
            .split_once('x')
            .ok_or(Self::Err::MalformedDimensions)?;

        Ok(Self {
            id: id.to_owned(),
            width: width.parse()?,
            height: height.parse()?,
            format: format.to_owned(),
        })
    }
}

impl Display for ImageAssetRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{IMAGE_ASSET_REF_PREFIX}{}-{}x{}-{}",
            self.id, self.width, self.height, self.format
        )
    }
}
