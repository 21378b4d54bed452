//! Export of reconstructed meshes: OBJ for viewing, JSON for the raw triangle list.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use tracing::info;

use crate::error::{MeshError, MeshResult};
use crate::types::{PositionSnapshot, Triangle};

/// Write `triangles` over `snapshot` as a Wavefront OBJ file.
///
/// Faces are 1-based and keep their stored winding.
pub fn save_obj(
    path: impl AsRef<Path>,
    snapshot: &PositionSnapshot,
    triangles: &[Triangle],
) -> MeshResult<()> {
    let path = path.as_ref();
    info!(
        path = %path.display(),
        vertices = snapshot.len(),
        faces = triangles.len(),
        "Saving mesh (OBJ format)"
    );

    let file = File::create(path).map_err(|e| MeshError::io_write(path, e))?;
    let mut writer = BufWriter::new(file);
    write_obj(&mut writer, snapshot, triangles).map_err(|e| MeshError::io_write(path, e))
}

/// OBJ body for `triangles`, written to any sink.
pub fn write_obj(
    writer: &mut impl Write,
    snapshot: &PositionSnapshot,
    triangles: &[Triangle],
) -> std::io::Result<()> {
    writeln!(writer, "# OBJ file exported by landmark-mesh")?;
    writeln!(writer, "# Vertices: {}", snapshot.len())?;
    writeln!(writer, "# Faces: {}", triangles.len())?;
    writeln!(writer)?;

    for p in snapshot.positions() {
        writeln!(writer, "v {:.6} {:.6} {:.6}", p.x, p.y, p.z)?;
    }
    for t in triangles {
        let [a, b, c] = t.indices();
        writeln!(writer, "f {} {} {}", a + 1, b + 1, c + 1)?;
    }
    writer.flush()
}

/// Write the triangle list as `[[v0, v1, v2], ...]`.
pub fn save_triangles_json(path: impl AsRef<Path>, triangles: &[Triangle]) -> MeshResult<()> {
    let path = path.as_ref();
    let json = serde_json::to_string(triangles)
        .map_err(|e| MeshError::parse_error(path, e.to_string()))?;
    std::fs::write(path, json).map_err(|e| MeshError::io_write(path, e))?;
    info!(path = %path.display(), triangles = triangles.len(), "Saved triangle list");
    Ok(())
}

/// Read a triangle list written by [`save_triangles_json`].
pub fn load_triangles_json(path: impl AsRef<Path>) -> MeshResult<Vec<Triangle>> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path).map_err(|e| MeshError::io_read(path, e))?;
    serde_json::from_str(&contents).map_err(|e| MeshError::parse_error(path, e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn square() -> (PositionSnapshot, Vec<Triangle>) {
        let snapshot = PositionSnapshot::from_coords(&[
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [1.0, 1.0, 0.0],
            [0.0, 1.0, 0.0],
        ]);
        (snapshot, vec![Triangle::new(0, 1, 2), Triangle::new(2, 3, 0)])
    }

    #[test]
    fn test_obj_faces_are_one_based() {
        let (snapshot, triangles) = square();
        let mut buf = Vec::new();
        write_obj(&mut buf, &snapshot, &triangles).unwrap();
        let text = String::from_utf8(buf).unwrap();

        assert_eq!(text.lines().filter(|l| l.starts_with("v ")).count(), 4);
        let faces: Vec<&str> = text.lines().filter(|l| l.starts_with("f ")).collect();
        assert_eq!(faces, vec!["f 1 2 3", "f 3 4 1"]);
        assert!(text.contains("v 1.000000 1.000000 0.000000"));
    }

    #[test]
    fn test_save_obj_to_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("square.obj");
        let (snapshot, triangles) = square();
        save_obj(&path, &snapshot, &triangles).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("# OBJ file exported by landmark-mesh"));
    }

    #[test]
    fn test_save_obj_bad_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing").join("square.obj");
        let (snapshot, triangles) = square();
        let err = save_obj(&path, &snapshot, &triangles).unwrap_err();
        assert!(matches!(err, MeshError::IoWrite { .. }));
    }

    #[test]
    fn test_triangles_json_roundtrip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("triangles.json");
        let (_, triangles) = square();
        save_triangles_json(&path, &triangles).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "[[0,1,2],[2,3,0]]");
        assert_eq!(load_triangles_json(&path).unwrap(), triangles);
    }

    #[test]
    fn test_load_triangles_json_errors() {
        let dir = tempdir().unwrap();
        let err = load_triangles_json(dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, MeshError::IoRead { .. }));

        let path = dir.path().join("bad.json");
        std::fs::write(&path, "[[0, 1]]").unwrap();
        let err = load_triangles_json(&path).unwrap_err();
        assert!(matches!(err, MeshError::ParseError { .. }));
    }
}
