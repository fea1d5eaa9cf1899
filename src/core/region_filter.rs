use crate::core::geometry::{parse_region, BBox};
use crate::core::model::{Page, Word};

/// Words of a page that fall inside one region, in page order.
#[derive(Debug, Clone, Default)]
pub struct RegionWords<'a> {
    pub words: Vec<&'a Word>,
    /// Words skipped because their metadata had no usable bbox.
    pub unparseable: usize,
}

pub fn words_in<'a>(page: &'a Page, region: &BBox) -> RegionWords<'a> {
    let mut result = RegionWords::default();
    for word in &page.words {
        match parse_region(&word.region_metadata) {
            Ok(bbox) if bbox.contained(region) => result.words.push(word),
            Ok(_) => {}
            Err(err) => {
                log::debug!("skipping word {:?}: {err}", word.content);
                result.unparseable += 1;
            }
        }
    }
    result
}
