// Copyright @yucwang 2026

use std::fs;
use std::path::Path;

use quick_xml::events::Event;
use quick_xml::Reader;

use crate::core::model::DustModel;
use crate::grids::cartesian::CartesianGrid;
use crate::math::aabb::AABB;
use crate::math::constants::{ Float, Vector3f, DEFAULT_MAX_SCATTERS };

#[derive(Debug)]
pub enum ModelLoadError {
    Io(std::io::Error),
    Parse(String),
    MissingField(&'static str),
}

impl From<std::io::Error> for ModelLoadError {
    fn from(err: std::io::Error) -> Self {
        ModelLoadError::Io(err)
    }
}

pub struct ModelLoadResult {
    pub model: DustModel,
    pub source: Vector3f,
    pub asymmetry: Float,
    pub photons: Option<u64>,
    pub seed: Option<u64>,
}

pub fn load_model<P: AsRef<Path>>(path: P) -> Result<ModelLoadResult, ModelLoadError> {
    let xml = fs::read_to_string(path.as_ref())?;
    parse_model(&xml)
}

struct SubgridDecl {
    parent_cell: (usize, usize, usize),
    nx: usize,
    ny: usize,
    nz: usize,
    density: Float,
}

fn parse_model(xml: &str) -> Result<ModelLoadResult, ModelLoadError> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);
    let mut buf = Vec::new();

    let mut grid_dims: Option<(usize, usize, usize)> = None;
    let mut grid_min: Option<Vector3f> = None;
    let mut grid_max: Option<Vector3f> = None;
    let mut grid_density: Option<Float> = None;
    let mut subgrids: Vec<SubgridDecl> = Vec::new();
    let mut max_scatters: u32 = DEFAULT_MAX_SCATTERS;
    let mut source: Option<Vector3f> = None;
    let mut asymmetry: Float = 0.0;
    let mut photons: Option<u64> = None;
    let mut seed: Option<u64> = None;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Eof) => break,
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) => {
                match e.name().as_ref() {
                    b"grid" => {
                        let mut nx: Option<usize> = None;
                        let mut ny: Option<usize> = None;
                        let mut nz: Option<usize> = None;
                        for attr in e.attributes().flatten() {
                            let value = attr.unescape_value().unwrap_or_default();
                            match attr.key.as_ref() {
                                b"nx" => nx = Some(parse_usize(&value)?),
                                b"ny" => ny = Some(parse_usize(&value)?),
                                b"nz" => nz = Some(parse_usize(&value)?),
                                b"min" => grid_min = Some(parse_vec3(&value)?),
                                b"max" => grid_max = Some(parse_vec3(&value)?),
                                b"density" => grid_density = Some(parse_float(&value)?),
                                _ => {}
                            }
                        }
                        let nx = nx.ok_or(ModelLoadError::MissingField("grid.nx"))?;
                        let ny = ny.ok_or(ModelLoadError::MissingField("grid.ny"))?;
                        let nz = nz.ok_or(ModelLoadError::MissingField("grid.nz"))?;
                        grid_dims = Some((nx, ny, nz));
                    }
                    b"subgrid" => {
                        let mut parent_cell: Option<(usize, usize, usize)> = None;
                        let mut nx: Option<usize> = None;
                        let mut ny: Option<usize> = None;
                        let mut nz: Option<usize> = None;
                        let mut density: Option<Float> = None;
                        for attr in e.attributes().flatten() {
                            let value = attr.unescape_value().unwrap_or_default();
                            match attr.key.as_ref() {
                                b"parent" => parent_cell = Some(parse_cell3(&value)?),
                                b"nx" => nx = Some(parse_usize(&value)?),
                                b"ny" => ny = Some(parse_usize(&value)?),
                                b"nz" => nz = Some(parse_usize(&value)?),
                                b"density" => density = Some(parse_float(&value)?),
                                _ => {}
                            }
                        }
                        subgrids.push(SubgridDecl {
                            parent_cell: parent_cell.ok_or(ModelLoadError::MissingField("subgrid.parent"))?,
                            nx: nx.ok_or(ModelLoadError::MissingField("subgrid.nx"))?,
                            ny: ny.ok_or(ModelLoadError::MissingField("subgrid.ny"))?,
                            nz: nz.ok_or(ModelLoadError::MissingField("subgrid.nz"))?,
                            density: density.ok_or(ModelLoadError::MissingField("subgrid.density"))?,
                        });
                    }
                    b"limits" => {
                        for attr in e.attributes().flatten() {
                            if attr.key.as_ref() == b"max_scatters" {
                                max_scatters = parse_u32(&attr.unescape_value().unwrap_or_default())?;
                            }
                        }
                    }
                    b"source" => {
                        for attr in e.attributes().flatten() {
                            if attr.key.as_ref() == b"origin" {
                                source = Some(parse_vec3(&attr.unescape_value().unwrap_or_default())?);
                            }
                        }
                    }
                    b"dust" => {
                        for attr in e.attributes().flatten() {
                            if attr.key.as_ref() == b"g" {
                                asymmetry = parse_float(&attr.unescape_value().unwrap_or_default())?;
                            }
                        }
                    }
                    b"run" => {
                        for attr in e.attributes().flatten() {
                            let value = attr.unescape_value().unwrap_or_default();
                            match attr.key.as_ref() {
                                b"photons" => photons = Some(parse_u64(&value)?),
                                b"seed" => seed = Some(parse_u64(&value)?),
                                _ => {}
                            }
                        }
                    }
                    _ => {}
                }
            }
            Ok(_) => {}
            Err(e) => {
                return Err(ModelLoadError::Parse(e.to_string()));
            }
        }
        buf.clear();
    }

    let (nx, ny, nz) = grid_dims.ok_or(ModelLoadError::MissingField("model.grid"))?;
    let p_min = grid_min.ok_or(ModelLoadError::MissingField("grid.min"))?;
    let p_max = grid_max.ok_or(ModelLoadError::MissingField("grid.max"))?;
    let density = grid_density.ok_or(ModelLoadError::MissingField("grid.density"))?;

    let root = CartesianGrid::uniform(nx, ny, nz, AABB::new(p_min, p_max), density)
        .map_err(ModelLoadError::Parse)?;
    let mut model = DustModel::new(root, max_scatters);

    for decl in subgrids {
        let (cx, cy, cz) = decl.parent_cell;
        let (rnx, rny, rnz) = model.root().dims();
        if cx >= rnx || cy >= rny || cz >= rnz {
            return Err(ModelLoadError::Parse(format!(
                "subgrid parent cell ({}, {}, {}) outside the root grid", cx, cy, cz
            )));
        }
        let cell_bounds = model.root().cell_bounds(cx, cy, cz);
        let subgrid = CartesianGrid::uniform(decl.nx, decl.ny, decl.nz, cell_bounds, decl.density)
            .map_err(ModelLoadError::Parse)?;
        model
            .attach_subgrid(0, decl.parent_cell, subgrid)
            .map_err(ModelLoadError::Parse)?;
    }

    Ok(ModelLoadResult {
        model,
        source: source.unwrap_or_else(Vector3f::zeros),
        asymmetry,
        photons,
        seed,
    })
}

fn parse_float(value: &str) -> Result<Float, ModelLoadError> {
    value.parse::<Float>().map_err(|_| ModelLoadError::Parse(format!("invalid float: {}", value)))
}

fn parse_u32(value: &str) -> Result<u32, ModelLoadError> {
    value.parse::<u32>().map_err(|_| ModelLoadError::Parse(format!("invalid integer: {}", value)))
}

fn parse_u64(value: &str) -> Result<u64, ModelLoadError> {
    value.parse::<u64>().map_err(|_| ModelLoadError::Parse(format!("invalid integer: {}", value)))
}

fn parse_usize(value: &str) -> Result<usize, ModelLoadError> {
    value.parse::<usize>().map_err(|_| ModelLoadError::Parse(format!("invalid integer: {}", value)))
}

fn parse_vec3(value: &str) -> Result<Vector3f, ModelLoadError> {
    let parts: Vec<&str> = value.split_whitespace().collect();
    if parts.len() != 3 {
        return Err(ModelLoadError::Parse(format!("expected three components: {}", value)));
    }
    Ok(Vector3f::new(
        parse_float(parts[0])?,
        parse_float(parts[1])?,
        parse_float(parts[2])?,
    ))
}

fn parse_cell3(value: &str) -> Result<(usize, usize, usize), ModelLoadError> {
    let parts: Vec<&str> = value.split_whitespace().collect();
    if parts.len() != 3 {
        return Err(ModelLoadError::Parse(format!("expected three indices: {}", value)));
    }
    Ok((parse_usize(parts[0])?, parse_usize(parts[1])?, parse_usize(parts[2])?))
}
