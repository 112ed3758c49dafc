//! Search filter for an AOI: buffered, simplified polygon plus date range

use chrono::NaiveDate;
use ecometrics_core::{Aoi, DateRange, Error, OccurrenceQuery, Result, SamplingPolicy};

use crate::vector::{
    buffer_polygon, clip_to_box, polygon_to_wkt, simplify_polygon, BufferParams, WORLD,
};

/// Build the occurrence search filter for `aoi`.
///
/// The AOI is buffered outward by `policy.buffer_m` to catch records near
/// the boundary, cut back to the valid lon/lat range (the margin does not
/// wrap across the antimeridian or over a pole), then simplified at
/// `policy.simplify_tolerance_m` to keep the WKT short. Dates cover the 365
/// days ending at `today`.
pub fn build_query(
    aoi: &Aoi,
    policy: &SamplingPolicy,
    today: NaiveDate,
) -> Result<OccurrenceQuery> {
    policy.validate()?;

    let buffered = buffer_polygon(
        aoi.polygon(),
        &BufferParams {
            distance_m: policy.buffer_m,
            ..BufferParams::default()
        },
    );
    let clipped = clip_to_box(&buffered, &WORLD)
        .ok_or_else(|| Error::InvalidGeometry("AOI lies outside the lon/lat range".into()))?;
    let simplified = simplify_polygon(&clipped, policy.simplify_tolerance_m);

    Ok(OccurrenceQuery {
        geometry_wkt: polygon_to_wkt(&simplified),
        date_range: DateRange::trailing_year(today),
    })
}
