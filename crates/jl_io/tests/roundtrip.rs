// crates/jl_io/tests/roundtrip.rs

//! 快照写出与读回测试

use glam::DVec2;
use jl_config::{IcConfig, ObstacleConfig, Precision, ScalarBlock};
use jl_ics::{BoundaryRole, IcGenerator};
use jl_io::gadget::HEADER_SIZE;
use jl_io::{GadgetReader, SnapshotWriter};
use tempfile::tempdir;

fn obstacle_config() -> IcConfig {
    IcConfig {
        resolution: 0.02,
        domain_extents: vec![1.0, 1.0],
        obstacle: Some(ObstacleConfig::new(DVec2::new(0.5, 0.5), 0.1)),
        ..IcConfig::default()
    }
}

#[test]
fn test_write_read_roundtrip_f32() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("ics.dat");
    let config = obstacle_config();

    let dataset = IcGenerator::new(&config).unwrap().generate().unwrap();
    SnapshotWriter::new(&config).write(&dataset, &path).unwrap();
    assert!(!dir.path().join("ics.dat.tmp").exists());

    let contents = GadgetReader::from_config(&config).read(&path).unwrap();
    let cells = dataset.cells();

    assert_eq!(contents.n_particles(), dataset.len());
    assert_eq!(contents.header.npart[0] as usize, dataset.len());
    assert_eq!(contents.header.n_total(), dataset.len() as u64);
    assert_eq!(contents.identifiers, dataset.identifiers());

    for (read, written) in contents.positions.iter().zip(cells.positions()) {
        assert!((*read - *written).abs().max_element() < 1e-6);
        assert_eq!(read.z, 0.0);
    }
    for (read, written) in contents.velocities.iter().zip(cells.velocities()) {
        assert!((*read - *written).abs().max_element() < 1e-6);
    }

    let density = contents.scalar(ScalarBlock::Density).unwrap();
    let energy = contents.scalar(ScalarBlock::InternalEnergy).unwrap();
    for i in 0..dataset.len() {
        assert!((density[i] - cells.densities()[i]).abs() < 1e-6);
        assert!((energy[i] - cells.specific_energies()[i]).abs() < 1e-6);
    }
}

#[test]
fn test_write_read_roundtrip_f64_exact() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested").join("ics_f64.dat");
    let mut config = obstacle_config();
    config.precision = Precision::F64;
    config.scalar_blocks = vec![ScalarBlock::InternalEnergy, ScalarBlock::Density];

    let dataset = IcGenerator::new(&config).unwrap().generate().unwrap();
    SnapshotWriter::new(&config).write(&dataset, &path).unwrap();

    let contents = GadgetReader::from_config(&config).read(&path).unwrap();
    assert_eq!(contents.positions, dataset.cells().positions());
    assert_eq!(contents.velocities, dataset.cells().velocities());
    assert_eq!(contents.scalars[0].0, ScalarBlock::InternalEnergy);
    assert_eq!(contents.scalars[0].1, dataset.cells().specific_energies());
    assert_eq!(contents.scalars[1].1, dataset.cells().densities());
}

#[test]
fn test_identical_config_byte_identical_output() {
    let dir = tempdir().unwrap();
    let config = obstacle_config();
    let first = dir.path().join("a.dat");
    let second = dir.path().join("b.dat");

    for path in [&first, &second] {
        let dataset = IcGenerator::new(&config).unwrap().generate().unwrap();
        SnapshotWriter::new(&config).write(&dataset, path).unwrap();
    }

    let a = std::fs::read(&first).unwrap();
    let b = std::fs::read(&second).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_header_record_layout() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("ics.dat");
    let config = IcConfig {
        resolution: 0.125,
        domain_extents: vec![2.0, 2.0],
        ..IcConfig::default()
    };

    let dataset = IcGenerator::new(&config).unwrap().generate().unwrap();
    SnapshotWriter::new(&config).write(&dataset, &path).unwrap();
    let bytes = std::fs::read(&path).unwrap();

    let marker = |at: usize| i32::from_ne_bytes(bytes[at..at + 4].try_into().unwrap());
    assert_eq!(marker(0), HEADER_SIZE as i32);
    assert_eq!(marker(4 + HEADER_SIZE), HEADER_SIZE as i32);

    let header = &bytes[4..4 + HEADER_SIZE];
    assert_eq!(i32::from_ne_bytes(header[0..4].try_into().unwrap()), 256);
    assert_eq!(f64::from_ne_bytes(header[128..136].try_into().unwrap()), 2.0);

    // 位置块紧随头部：256 个粒子，每个 3 个 f32
    assert_eq!(marker(8 + HEADER_SIZE), 256 * 12);
}

#[test]
fn test_role_histogram_after_read() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("ics.dat");
    let config = obstacle_config();

    let dataset = IcGenerator::new(&config).unwrap().generate().unwrap();
    SnapshotWriter::new(&config).write(&dataset, &path).unwrap();
    let contents = GadgetReader::from_config(&config).read(&path).unwrap();

    let (histogram, unknown) = contents.role_histogram();
    assert_eq!(unknown, 0);
    assert_eq!(histogram, dataset.role_histogram());
    assert!(histogram
        .iter()
        .any(|(role, n)| *role == BoundaryRole::ReflectiveSolid && *n > 0));
}

#[test]
fn test_missing_snapshot_is_io_error() {
    let dir = tempdir().unwrap();
    let reader = GadgetReader::new(Precision::F32, ScalarBlock::default_order());
    let err = reader.read(&dir.path().join("missing.dat")).unwrap_err();
    let err: jl_foundation::JlError = err.into();
    assert_eq!(err.kind(), "IOError");
}

#[test]
fn test_failed_write_leaves_no_temp_file() {
    let dir = tempdir().unwrap();
    let config = obstacle_config();
    let dataset = IcGenerator::new(&config).unwrap().generate().unwrap();

    // 目标路径是已存在的目录，重命名失败
    let target = dir.path().join("occupied");
    std::fs::create_dir(&target).unwrap();
    std::fs::write(target.join("keep"), b"x").unwrap();

    assert!(SnapshotWriter::new(&config).write(&dataset, &target).is_err());
    assert!(!dir.path().join("occupied.tmp").exists());
}
