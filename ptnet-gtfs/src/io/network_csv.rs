use super::{record_file, IoError};
use geo::{Geometry, LineString};
use itertools::Itertools;
use ptnet_core::model::{
    AttributeValue, AugmentationContext, Network, NetworkLink, NetworkNode,
};
use std::collections::BTreeSet;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use std::str::FromStr;
use wkt::{ToWkt, Wkt};

/// reads the roadway node and link tables and assembles the base network
pub fn load_network(nodes_path: &Path, links_path: &Path) -> Result<Network, IoError> {
    let mut network = Network::new();
    for node in read_nodes(open(nodes_path)?, &label(nodes_path))? {
        network.add_node(node);
    }
    for link in read_links(open(links_path)?, &label(links_path))? {
        network.add_link(link)?;
    }
    Ok(network)
}

/// node table reader: requires N, X and Y columns, every other column
/// lands in the node's attribute map
pub fn read_nodes<R: Read>(reader: R, path: &str) -> Result<Vec<NetworkNode>, IoError> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let headers = read_headers(&mut csv_reader, path)?;
    let n = column_index(&headers, "N")?;
    let x = column_index(&headers, "X")?;
    let y = column_index(&headers, "Y")?;

    let mut nodes = vec![];
    for row in csv_reader.into_records() {
        let row = row.map_err(|e| read_error(path, &e))?;
        let id = parse_id(row.get(n).unwrap_or_default(), path)?;
        let mut node = NetworkNode::new(
            id,
            parse_float(row.get(x).unwrap_or_default(), path)?,
            parse_float(row.get(y).unwrap_or_default(), path)?,
        );
        node.attributes = collect_attributes(&headers, &row, &[n, x, y]);
        nodes.push(node);
    }
    Ok(nodes)
}

/// link table reader: requires A, B and a WKT linestring `geometry`
/// column, every other column lands in the link's attribute map
pub fn read_links<R: Read>(reader: R, path: &str) -> Result<Vec<NetworkLink>, IoError> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let headers = read_headers(&mut csv_reader, path)?;
    let a = column_index(&headers, "A")?;
    let b = column_index(&headers, "B")?;
    let geometry = column_index(&headers, "geometry")?;

    let mut links = vec![];
    for row in csv_reader.into_records() {
        let row = row.map_err(|e| read_error(path, &e))?;
        let mut link = NetworkLink::new(
            parse_id(row.get(a).unwrap_or_default(), path)?,
            parse_id(row.get(b).unwrap_or_default(), path)?,
            parse_linestring(row.get(geometry).unwrap_or_default(), path)?,
        );
        link.attributes = collect_attributes(&headers, &row, &[a, b, geometry]);
        links.push(link);
    }
    Ok(links)
}

/// writes the augmented node and link tables, original plus transit-only
/// elements, with WKT geometry columns
pub fn write_network(directory: &Path, network: &Network) -> Result<(), IoError> {
    let node_columns = attribute_columns(network.nodes().map(|n| &n.attributes));
    let nodes_path = directory.join("nodes_with_transit.csv");
    let mut writer = create_writer(&nodes_path)?;
    let mut header = vec![String::from("N"), String::from("X"), String::from("Y")];
    header.extend(node_columns.clone());
    write_row(&mut writer, &nodes_path, &header)?;
    for node in network.nodes() {
        let mut row = vec![
            node.id.to_string(),
            node.x().to_string(),
            node.y().to_string(),
        ];
        row.extend(attribute_cells(&node.attributes, &node_columns));
        write_row(&mut writer, &nodes_path, &row)?;
    }

    let link_columns = attribute_columns(network.links().map(|l| &l.attributes));
    let links_path = directory.join("links_with_transit.csv");
    let mut writer = create_writer(&links_path)?;
    let mut header = vec![String::from("A"), String::from("B")];
    header.extend(link_columns.clone());
    header.push(String::from("geometry"));
    write_row(&mut writer, &links_path, &header)?;
    for link in network.links() {
        let mut row = vec![link.a.to_string(), link.b.to_string()];
        row.extend(attribute_cells(&link.attributes, &link_columns));
        row.push(format!("{}", link.geometry.to_wkt()));
        write_row(&mut writer, &links_path, &row)?;
    }
    Ok(())
}

/// exports the transit-only registries to csv plus the fixed-schema record
/// files used for import into the travel-demand tool
pub fn write_transit_only(
    directory: &Path,
    context: &AugmentationContext,
) -> Result<(), IoError> {
    let node_columns = attribute_columns(context.nodes().map(|n| &n.attributes));
    let mut columns = vec![String::from("N"), String::from("X"), String::from("Y")];
    columns.extend(node_columns.clone());
    let rows = context
        .nodes()
        .map(|node| {
            let mut row = vec![
                AttributeValue::Number(node.id as f64),
                AttributeValue::Number(node.x()),
                AttributeValue::Number(node.y()),
            ];
            row.extend(attribute_values(&node.attributes, &node_columns));
            row
        })
        .collect_vec();
    write_table_and_records(directory, "transit_only_nodes", &columns, &rows)?;

    let link_columns = attribute_columns(context.links().map(|l| &l.attributes));
    let mut columns = vec![String::from("A"), String::from("B")];
    columns.extend(link_columns.clone());
    let rows = context
        .links()
        .map(|link| {
            let mut row = vec![
                AttributeValue::Number(link.a as f64),
                AttributeValue::Number(link.b as f64),
            ];
            row.extend(attribute_values(&link.attributes, &link_columns));
            row
        })
        .collect_vec();
    write_table_and_records(directory, "transit_only_links", &columns, &rows)?;
    Ok(())
}

fn write_table_and_records(
    directory: &Path,
    stem: &str,
    columns: &[String],
    rows: &[Vec<AttributeValue>],
) -> Result<(), IoError> {
    let csv_path = directory.join(format!("{stem}.csv"));
    let mut writer = create_writer(&csv_path)?;
    write_row(&mut writer, &csv_path, columns)?;
    for row in rows {
        let cells = row.iter().map(|v| v.to_string()).collect_vec();
        write_row(&mut writer, &csv_path, &cells)?;
    }

    let rec_path = directory.join(format!("{stem}.rec"));
    let mut file = File::create(&rec_path).map_err(|e| IoError::WriteError {
        path: label(&rec_path),
        message: format!("{e}"),
    })?;
    record_file::write_records(&mut file, columns, rows).map_err(|e| IoError::WriteError {
        path: label(&rec_path),
        message: format!("{e}"),
    })
}

/// sorted union of attribute keys across a table
fn attribute_columns<'a, I>(maps: I) -> Vec<String>
where
    I: Iterator<Item = &'a ptnet_core::model::AttributeMap>,
{
    let keys: BTreeSet<String> = maps.flat_map(|m| m.keys().cloned()).collect();
    keys.into_iter().collect()
}

fn attribute_cells(map: &ptnet_core::model::AttributeMap, columns: &[String]) -> Vec<String> {
    columns
        .iter()
        .map(|key| map.get(key).map(|v| v.to_string()).unwrap_or_default())
        .collect()
}

fn attribute_values(
    map: &ptnet_core::model::AttributeMap,
    columns: &[String],
) -> Vec<AttributeValue> {
    columns
        .iter()
        .map(|key| {
            map.get(key)
                .cloned()
                .unwrap_or_else(|| AttributeValue::Text(String::new()))
        })
        .collect()
}

fn parse_linestring(raw: &str, path: &str) -> Result<LineString<f64>, IoError> {
    let wkt = Wkt::<f64>::from_str(raw).map_err(|e| IoError::ReadError {
        path: String::from(path),
        message: format!("invalid WKT '{raw}': {e}"),
    })?;
    let geometry = Geometry::try_from(wkt).map_err(|e| IoError::ReadError {
        path: String::from(path),
        message: format!("unsupported WKT '{raw}': {e}"),
    })?;
    match geometry {
        Geometry::LineString(linestring) => Ok(linestring),
        other => Err(IoError::GeometryType {
            expected: String::from("LINESTRING"),
            found: String::from(geometry_name(&other)),
        }),
    }
}

fn geometry_name(geometry: &Geometry<f64>) -> &'static str {
    match geometry {
        Geometry::Point(_) => "POINT",
        Geometry::Line(_) => "LINE",
        Geometry::LineString(_) => "LINESTRING",
        Geometry::Polygon(_) => "POLYGON",
        Geometry::MultiPoint(_) => "MULTIPOINT",
        Geometry::MultiLineString(_) => "MULTILINESTRING",
        Geometry::MultiPolygon(_) => "MULTIPOLYGON",
        Geometry::GeometryCollection(_) => "GEOMETRYCOLLECTION",
        Geometry::Rect(_) => "RECT",
        Geometry::Triangle(_) => "TRIANGLE",
    }
}

fn collect_attributes(
    headers: &csv::StringRecord,
    row: &csv::StringRecord,
    skip: &[usize],
) -> ptnet_core::model::AttributeMap {
    let mut attributes = ptnet_core::model::AttributeMap::new();
    for (index, name) in headers.iter().enumerate() {
        if skip.contains(&index) {
            continue;
        }
        let raw = row.get(index).unwrap_or_default();
        if raw.is_empty() {
            continue;
        }
        let value = match raw.parse::<f64>() {
            Ok(number) => AttributeValue::Number(number),
            Err(_) => AttributeValue::Text(String::from(raw)),
        };
        attributes.insert(String::from(name), value);
    }
    attributes
}

fn read_headers<R: Read>(
    reader: &mut csv::Reader<R>,
    path: &str,
) -> Result<csv::StringRecord, IoError> {
    reader
        .headers()
        .map(|h| h.clone())
        .map_err(|e| read_error(path, &e))
}

fn column_index(headers: &csv::StringRecord, name: &str) -> Result<usize, IoError> {
    headers
        .iter()
        .position(|h| h == name)
        .ok_or_else(|| IoError::MissingColumn(String::from(name)))
}

fn parse_id(raw: &str, path: &str) -> Result<i64, IoError> {
    // node ids sometimes arrive as floats from tabular exports
    raw.trim()
        .parse::<i64>()
        .or_else(|_| raw.trim().parse::<f64>().map(|f| f as i64))
        .map_err(|e| IoError::ReadError {
            path: String::from(path),
            message: format!("invalid id '{raw}': {e}"),
        })
}

fn parse_float(raw: &str, path: &str) -> Result<f64, IoError> {
    raw.trim().parse::<f64>().map_err(|e| IoError::ReadError {
        path: String::from(path),
        message: format!("invalid number '{raw}': {e}"),
    })
}

fn read_error(path: &str, error: &csv::Error) -> IoError {
    IoError::ReadError {
        path: String::from(path),
        message: format!("{error}"),
    }
}

fn open(path: &Path) -> Result<File, IoError> {
    File::open(path).map_err(|e| IoError::ReadError {
        path: label(path),
        message: format!("{e}"),
    })
}

fn create_writer(path: &Path) -> Result<csv::Writer<File>, IoError> {
    csv::WriterBuilder::new()
        .from_path(path)
        .map_err(|e| IoError::WriteError {
            path: label(path),
            message: format!("{e}"),
        })
}

fn write_row<W: Write>(
    writer: &mut csv::Writer<W>,
    path: &Path,
    row: &[String],
) -> Result<(), IoError> {
    writer.write_record(row).map_err(|e| IoError::WriteError {
        path: label(path),
        message: format!("{e}"),
    })
}

fn label(path: &Path) -> String {
    path.to_str().unwrap_or_default().to_string()
}
