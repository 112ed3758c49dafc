//! Area of interest
//!
//! An AOI is a single simple polygon in WGS84 longitude/latitude, the way
//! a map UI draws it. GeoJSON input may be a FeatureCollection (first
//! feature is used), a Feature, or a bare geometry.

use geo_types::{Coord, Geometry, Polygon};
use geojson::GeoJson;

use crate::error::{Error, Result};

/// Validated area of interest in lon/lat degrees.
#[derive(Debug, Clone, PartialEq)]
pub struct Aoi {
    polygon: Polygon<f64>,
}

impl Aoi {
    /// Wrap a polygon after checking that its exterior ring is usable.
    pub fn new(polygon: Polygon<f64>) -> Result<Self> {
        let ring = &polygon.exterior().0;
        if ring.is_empty() {
            return Err(Error::EmptyGeometry);
        }
        if let Some(bad) = ring.iter().find(|c| !valid_lon_lat(c)) {
            return Err(Error::InvalidGeometry(format!(
                "coordinate ({}, {}) is not a valid longitude/latitude",
                bad.x, bad.y
            )));
        }

        let mut distinct: Vec<Coord<f64>> = Vec::with_capacity(ring.len());
        for c in ring {
            if !distinct.contains(c) {
                distinct.push(*c);
            }
        }
        if distinct.len() < 3 {
            return Err(Error::InvalidGeometry(format!(
                "polygon needs at least 3 distinct vertices, got {}",
                distinct.len()
            )));
        }

        Ok(Self { polygon })
    }

    /// Parse an AOI from GeoJSON text.
    pub fn from_geojson_str(s: &str) -> Result<Self> {
        let gj: GeoJson = s
            .parse()
            .map_err(|e| Error::InvalidGeometry(format!("GeoJSON: {e}")))?;

        let geometry = match gj {
            GeoJson::FeatureCollection(fc) => fc
                .features
                .into_iter()
                .next()
                .and_then(|f| f.geometry)
                .ok_or(Error::EmptyGeometry)?,
            GeoJson::Feature(f) => f.geometry.ok_or(Error::EmptyGeometry)?,
            GeoJson::Geometry(g) => g,
        };

        let geometry = Geometry::<f64>::try_from(geometry)
            .map_err(|e| Error::InvalidGeometry(format!("GeoJSON: {e}")))?;

        match geometry {
            Geometry::Polygon(p) => Self::new(p),
            Geometry::Rect(r) => Self::new(r.to_polygon()),
            Geometry::MultiPolygon(mp) if mp.0.len() == 1 => {
                Self::new(mp.0.into_iter().next().ok_or(Error::EmptyGeometry)?)
            }
            other => Err(Error::InvalidGeometry(format!(
                "expected a single polygon, got {}",
                geometry_name(&other)
            ))),
        }
    }

    /// Serialize the AOI as a GeoJSON geometry.
    pub fn to_geojson_string(&self) -> Result<String> {
        let geometry = geojson::Geometry::new(geojson::Value::from(&self.polygon));
        serde_json::to_string(&geometry).map_err(|e| Error::Other(e.to_string()))
    }

    pub fn polygon(&self) -> &Polygon<f64> {
        &self.polygon
    }

    pub fn into_polygon(self) -> Polygon<f64> {
        self.polygon
    }
}

fn valid_lon_lat(c: &Coord<f64>) -> bool {
    c.x.is_finite() && c.y.is_finite() && c.x.abs() <= 180.0 && c.y.abs() <= 90.0
}

fn geometry_name(g: &Geometry<f64>) -> &'static str {
    match g {
        Geometry::Point(_) => "Point",
        Geometry::Line(_) => "Line",
        Geometry::LineString(_) => "LineString",
        Geometry::Polygon(_) => "Polygon",
        Geometry::MultiPoint(_) => "MultiPoint",
        Geometry::MultiLineString(_) => "MultiLineString",
        Geometry::MultiPolygon(_) => "MultiPolygon",
        Geometry::GeometryCollection(_) => "GeometryCollection",
        Geometry::Rect(_) => "Rect",
        Geometry::Triangle(_) => "Triangle",
    }
}
