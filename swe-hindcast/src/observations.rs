use swe_core::error::Result;
use swe_core::region::Region;
use swe_core::site::{RegionalObservation, SiteObservation};
use swe_core::store::TableStore;

/// Load every region's held-out observations into one list, tagging each row
/// with the region it was read for. Rows keep file order, regions keep the
/// order given.
pub fn load_observations(store: &TableStore, regions: &[String]) -> Result<Vec<RegionalObservation>> {
    let mut all = Vec::new();
    for name in regions {
        let rows: Vec<SiteObservation> = store.read_records(name)?;
        log::info!("Loaded {} observations for {}", rows.len(), name);
        let region = Region::from(name.as_str());
        all.extend(rows.into_iter().map(|observation| RegionalObservation {
            region: region.clone(),
            observation,
        }));
    }
    Ok(all)
}
