use breakroom_common::model::image::{Image, ImageCrop};
use url::Url;

pub const IMAGE_CDN_BASE: &str = "https://cdn.sanity.io/images/";

#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Hash)]
pub enum ImageFit {
    Crop,
}

impl ImageFit {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ImageFit::Crop => "crop",
        }
    }
}

/// Turns image asset references into CDN urls of one project's dataset.
#[derive(Clone, Eq, PartialEq, Debug, Hash)]
pub struct ImageUrlBuilder {
    base: Url,
}

#[derive(Clone, Debug)]
pub struct ImageUrl<'a> {
    base: &'a Url,
    image: &'a Image,
    width: Option<u32>,
    height: Option<u32>,
    fit: Option<ImageFit>,
}

impl ImageUrlBuilder {
    pub fn new(project_id: &str, dataset: &str) -> Result<Self, url::ParseError> {
        let base = Url::parse(IMAGE_CDN_BASE)?.join(&format!("{project_id}/{dataset}/"))?;
        Ok(Self { base })
    }

    #[must_use]
    pub fn image<'a>(&'a self, image: &'a Image) -> ImageUrl<'a> {
        ImageUrl {
            base: &self.base,
            image,
            width: None,
            height: None,
            fit: None,
        }
    }
}

impl ImageUrl<'_> {
    #[must_use]
    pub fn width(mut self, width: u32) -> Self {
        self.width = Some(width);
        self
    }

    #[must_use]
    pub fn height(mut self, height: u32) -> Self {
        self.height = Some(height);
        self
    }

    #[must_use]
    pub fn fit(mut self, fit: ImageFit) -> Self {
        self.fit = Some(fit);
        self
    }

    pub fn url(&self) -> Result<Url, url::ParseError> {
        let asset = &self.image.asset;
        let mut url = self.base.join(&format!(
            "{}-{}x{}.{}",
            asset.id, asset.width, asset.height, asset.format
        ))?;

        let rect = self
            .image
            .crop
            .filter(|crop| !crop.is_empty())
            .map(|crop| crop_rect(crop, asset.width.get(), asset.height.get()));

        if rect.is_some() || self.width.is_some() || self.height.is_some() || self.fit.is_some() {
            let mut pairs = url.query_pairs_mut();
            if let Some([left, top, width, height]) = rect {
                pairs.append_pair("rect", &format!("{left},{top},{width},{height}"));
            }
            if let Some(width) = self.width {
                pairs.append_pair("w", &width.to_string());
            }
            if let Some(height) = self.height {
                pairs.append_pair("h", &height.to_string());
            }
            if let Some(fit) = self.fit {
                pairs.append_pair("fit", fit.as_str());
            }
        }

        Ok(url)
    }
}

/// `[left, top, width, height]` in source pixels.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn crop_rect(crop: ImageCrop, width: u32, height: u32) -> [u32; 4] {
    let width = f64::from(width);
    let height = f64::from(height);

    let left = (crop.left * width).round();
    let top = (crop.top * height).round();
    let crop_width = (width - crop.right * width - left).round();
    let crop_height = (height - crop.bottom * height - top).round();

    [left, top, crop_width, crop_height].map(|value| value.max(0.0) as u32)
}
