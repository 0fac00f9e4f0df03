//! Loading files through `JpegReader`, directly and via the read worker,
//! and rendering previews from what was loaded.

use std::sync::Arc;

use image::GenericImageView;
use jpeg_meta::{
    FileSource, IoError, JpegReader, LoadError, MetadataError, PreviewRenderer, ReadWorker, Value,
};

use super::test_utils::{create_test_jpeg, ExifBuilder, IfdBuilder, JpegBuilder, MockByteSource};

fn canon_jpeg() -> Vec<u8> {
    JpegBuilder::new()
        .exif(ExifBuilder::new(IfdBuilder::new().ascii(0x010f, "Canon")))
        .build()
}

// =============================================================================
// Direct reads
// =============================================================================

#[tokio::test]
async fn test_load_direct() {
    let source = Arc::new(MockByteSource::new().with_file("a.jpg", canon_jpeg()));
    let reader = JpegReader::new(source.clone());
    assert!(!reader.uses_worker());

    let loaded = reader.load("a.jpg").await.unwrap();
    assert_eq!(loaded.id, "a.jpg");
    assert_eq!(loaded.bytes.len(), canon_jpeg().len());

    let metadata = loaded.metadata.unwrap();
    assert_eq!(metadata.exif["Make"], Value::String("Canon".into()));
    assert_eq!(source.read_count(), 1);
}

#[tokio::test]
async fn test_non_jpeg_name_is_not_read() {
    let source = Arc::new(MockByteSource::new().with_file("a.png", canon_jpeg()));
    let reader = JpegReader::new(source.clone());

    let result = reader.load("a.png").await;
    assert!(matches!(result, Err(LoadError::NotJpeg(ref id)) if id == "a.png"));
    assert_eq!(source.read_count(), 0);
}

#[tokio::test]
async fn test_missing_file() {
    let reader = JpegReader::new(Arc::new(MockByteSource::new()));

    let result = reader.load("missing.jpg").await;
    assert!(matches!(
        result,
        Err(LoadError::Io(IoError::NotFound(ref id))) if id == "missing.jpg"
    ));
}

#[tokio::test]
async fn test_decode_failure_keeps_bytes() {
    let data = JpegBuilder::new()
        .segment(0xE1, b"Exif\0\0XX\x2A\0\x08\0\0\0")
        .build();
    let source = Arc::new(MockByteSource::new().with_file("broken.jpg", data.clone()));
    let reader = JpegReader::new(source);

    let loaded = reader.load("broken.jpg").await.unwrap();
    assert_eq!(loaded.metadata, Err(MetadataError::UnknownByteOrder));
    assert_eq!(&loaded.bytes[..], &data[..]);
}

#[tokio::test]
async fn test_not_a_jpeg_content() {
    let source = Arc::new(MockByteSource::new().with_file("fake.jpg", b"GIF89a".to_vec()));
    let reader = JpegReader::new(source);

    let loaded = reader.load("fake.jpg").await.unwrap();
    assert_eq!(loaded.metadata, Err(MetadataError::NotAJpeg));
}

#[tokio::test]
async fn test_load_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("photo.JPG"), canon_jpeg()).unwrap();

    let reader = JpegReader::new(Arc::new(FileSource::with_root(dir.path())));
    let loaded = reader.load("photo.JPG").await.unwrap();
    assert_eq!(
        loaded.metadata.unwrap().exif["Make"],
        Value::String("Canon".into())
    );

    let result = reader.load("other.jpg").await;
    assert!(matches!(result, Err(LoadError::Io(IoError::NotFound(_)))));
}

// =============================================================================
// Worker reads
// =============================================================================

#[tokio::test]
async fn test_load_via_worker() {
    let source = Arc::new(MockByteSource::new().with_file("a.jpg", canon_jpeg()));
    let reader = JpegReader::with_worker(source.clone());
    assert!(reader.uses_worker());

    let loaded = reader.load("a.jpg").await.unwrap();
    assert_eq!(
        loaded.metadata.unwrap().exif["Make"],
        Value::String("Canon".into())
    );
    assert_eq!(source.read_count(), 1);

    reader.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_worker_read_failure() {
    let reader = JpegReader::with_worker(Arc::new(MockByteSource::new()));

    let result = reader.load("missing.jpg").await;
    match result {
        Err(LoadError::Io(IoError::Read { id, message })) => {
            assert_eq!(id, "missing.jpg");
            assert!(message.contains("missing.jpg"));
        }
        other => panic!("unexpected result: {:?}", other.map(|l| l.id)),
    }

    reader.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_worker_and_direct_agree() {
    let data = canon_jpeg();
    let source = Arc::new(MockByteSource::new().with_file("a.jpg", data));

    let direct = JpegReader::new(source.clone()).load("a.jpg").await.unwrap();
    let worker = JpegReader::with_worker(source.clone());
    let queued = worker.load("a.jpg").await.unwrap();

    assert_eq!(direct.bytes, queued.bytes);
    assert_eq!(direct.metadata, queued.metadata);
    worker.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_worker_serves_concurrent_requests() {
    let source = Arc::new(
        MockByteSource::new()
            .with_file("a.jpg", canon_jpeg())
            .with_file("b.jpg", create_test_jpeg(8, 8)),
    );
    let worker = ReadWorker::with_queue_depth(source.clone(), 1);

    let (a, b, c) = tokio::join!(
        worker.read("a.jpg"),
        worker.read("b.jpg"),
        worker.read("c.jpg")
    );

    assert!(a.unwrap().error.is_none());
    assert_eq!(b.unwrap().result.len(), create_test_jpeg(8, 8).len());
    let c = c.unwrap();
    assert!(c.result.is_empty());
    assert!(c.error.is_some());
    assert_eq!(source.read_count(), 3);

    worker.shutdown().await.unwrap();
}

// =============================================================================
// Previews
// =============================================================================

fn is_red(pixel: image::Rgba<u8>) -> bool {
    pixel[0] > 180 && pixel[2] < 80
}

fn is_blue(pixel: image::Rgba<u8>) -> bool {
    pixel[2] > 180 && pixel[0] < 80
}

#[tokio::test]
async fn test_preview_from_full_image() {
    // 64x32, red left and blue right; orientation 6 turns left into top
    let data = JpegBuilder::new()
        .exif(ExifBuilder::new(IfdBuilder::new().short(0x0112, 6)))
        .with_image(&create_test_jpeg(64, 32))
        .build();
    let source = Arc::new(MockByteSource::new().with_file("p.jpg", data));
    let loaded = JpegReader::new(source).load("p.jpg").await.unwrap();

    let metadata = loaded.metadata.unwrap();
    assert_eq!(metadata.orientation(), Some(6));
    assert!(metadata.thumbnail.is_none());

    let renderer = PreviewRenderer::new(16, 16, 90).unwrap();
    let preview = renderer.render(&metadata, &loaded.bytes).unwrap();
    let img = image::load_from_memory(&preview).unwrap();

    assert_eq!(img.dimensions(), (16, 16));
    assert!(is_red(img.get_pixel(8, 2)));
    assert!(is_blue(img.get_pixel(8, 13)));
}

#[tokio::test]
async fn test_preview_prefers_thumbnail() {
    // The thumbnail is upright; the Orientation tag describes the full image
    let data = JpegBuilder::new()
        .exif(
            ExifBuilder::new(IfdBuilder::new().short(0x0112, 3))
                .with_thumbnail(create_test_jpeg(32, 32)),
        )
        .with_image(&create_test_jpeg(64, 64))
        .build();
    let source = Arc::new(MockByteSource::new().with_file("t.jpg", data));
    let loaded = JpegReader::new(source).load("t.jpg").await.unwrap();
    let metadata = loaded.metadata.unwrap();
    assert!(metadata.thumbnail.is_some());

    let preview = PreviewRenderer::default()
        .render(&metadata, &loaded.bytes)
        .unwrap();
    let img = image::load_from_memory(&preview).unwrap();

    assert_eq!(img.dimensions(), (100, 100));
    assert!(is_red(img.get_pixel(10, 50)));
    assert!(is_blue(img.get_pixel(90, 50)));
}

#[test]
fn test_preview_of_metadata_only_file_fails() {
    let renderer = PreviewRenderer::default();
    let metadata = jpeg_meta::MetadataExtractor::new()
        .parse(canon_jpeg())
        .unwrap();

    assert!(renderer.render(&metadata, &canon_jpeg()).is_err());
}
