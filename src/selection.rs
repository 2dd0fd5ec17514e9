//! Creative selection.
use crate::entity::AdPlacement;
use crate::entity::Creative;

/// Pick the highest-priced creative that [fits](Creative::fits) the placement.
///
/// The running maximum starts at zero and a candidate only wins with a strictly greater price. Hence:
///
/// - on a price tie the creative that comes first in `creatives` is kept;
/// - a creative priced at zero is never selected, even when it is the only one that fits.
///
/// `None` means nothing is applicable; it is a normal outcome, not an error.
pub fn select_creative<'a>(placement: &AdPlacement, creatives: &'a [Creative]) -> Option<&'a Creative> {
    let mut selected = None;
    let mut highest_price = 0.0;

    for creative in creatives.iter().filter(|c| c.fits(placement)) {
        if creative.price > highest_price {
            highest_price = creative.price;
            selected = Some(creative);
        }
    }

    selected
}
