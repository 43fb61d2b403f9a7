//! Gatekeeper pipeline tests over a mocked blob store.

use std::sync::Arc;

use rstest::rstest;

use super::*;
use crate::domain::ErrorCode;
use crate::domain::ports::MockUploadStore;

const PNG_MAGIC: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a];

fn png_payload(extra: usize) -> Vec<u8> {
    let mut bytes = PNG_MAGIC.to_vec();
    bytes.extend(std::iter::repeat(0u8).take(extra));
    bytes
}

fn service_with_store(store: MockUploadStore) -> UploadService {
    UploadService::new(Arc::new(store))
}

fn rejecting_store() -> MockUploadStore {
    let mut store = MockUploadStore::new();
    store.expect_save().never();
    store
}

#[tokio::test]
async fn clean_image_is_stored_under_random_name() {
    let mut store = MockUploadStore::new();
    store
        .expect_save()
        .withf(|name, bytes| {
            name.len() == 32 + ".png".len()
                && name.ends_with(".png")
                && bytes.starts_with(&PNG_MAGIC)
        })
        .times(1)
        .return_once(|_, _| Ok(()));

    let attachment = service_with_store(store)
        .store_image("Holiday Photo.PNG", "image/png", &png_payload(64))
        .await
        .expect("accepted");

    assert_eq!(attachment.original_name, "Holiday Photo.PNG");
    assert_eq!(attachment.mimetype, "image/png");
    assert!(attachment.is_image);
    assert_eq!(attachment.size, 72);
    assert!(attachment.filename.ends_with(".png"));
}

#[rstest]
#[case("payload.exe", "image/png", "dangerous file type")]
#[case("script.js", "image/png", "dangerous file type")]
#[case("report.pdf", "application/pdf", "Only images allowed")]
#[case("photo.png", "application/octet-stream", "Only images allowed")]
#[tokio::test]
async fn bad_names_and_types_never_reach_the_store(
    #[case] name: &str,
    #[case] mime: &str,
    #[case] message: &str,
) {
    let err = service_with_store(rejecting_store())
        .store_image(name, mime, &png_payload(16))
        .await
        .expect_err("rejected");
    assert_eq!(err.code, ErrorCode::InvalidRequest);
    assert_eq!(err.message, message);
}

#[tokio::test]
async fn oversized_upload_is_rejected() {
    let err = service_with_store(rejecting_store())
        .store_image("big.png", "image/png", &png_payload(UploadService::max_bytes()))
        .await
        .expect_err("too large");
    assert_eq!(err.message, "File too large (max 2MB)");
}

#[tokio::test]
async fn disguised_executable_fails_the_signature_scan() {
    // MZ header on a file that passes every metadata check.
    let mut bytes = vec![0x4d, 0x5a];
    bytes.extend_from_slice(&[0u8; 30]);

    let err = service_with_store(rejecting_store())
        .store_image("shell.png", "image/png", &bytes)
        .await
        .expect_err("rejected");
    assert_eq!(err.code, ErrorCode::InvalidRequest);
    assert_eq!(err.message, "File failed security scan");
}

#[tokio::test]
async fn embedded_script_fails_the_content_scan() {
    let mut bytes = PNG_MAGIC.to_vec();
    bytes.extend_from_slice(b"<SCRIPT>alert(1)</SCRIPT>");

    let err = service_with_store(rejecting_store())
        .store_image("sneaky.png", "image/png", &bytes)
        .await
        .expect_err("rejected");
    assert_eq!(err.message, "File failed security scan");
}

#[tokio::test]
async fn store_failure_surfaces_as_internal() {
    let mut store = MockUploadStore::new();
    store
        .expect_save()
        .return_once(|_, _| Err(UploadStoreError::io("disk full")));

    let err = service_with_store(store)
        .store_image("photo.png", "image/png", &png_payload(16))
        .await
        .expect_err("store down");
    assert_eq!(err.code, ErrorCode::InternalError);
}

#[rstest]
#[case("../../etc/passwd")]
#[case("nested/name.png")]
#[case("back\\slash.png")]
#[tokio::test]
async fn traversal_names_read_as_missing(#[case] name: &str) {
    let mut store = MockUploadStore::new();
    store.expect_load().never();

    let err = service_with_store(store)
        .open(name)
        .await
        .expect_err("unsafe name");
    assert_eq!(err.code, ErrorCode::NotFound);
}

#[tokio::test]
async fn open_guesses_the_content_type() {
    let mut store = MockUploadStore::new();
    store
        .expect_load()
        .return_once(|_| Ok(png_payload(4)));

    let file = service_with_store(store)
        .open("abcd1234abcd1234abcd1234abcd1234.png")
        .await
        .expect("open");
    assert_eq!(file.content_type, "image/png");
    assert!(file.bytes.starts_with(&PNG_MAGIC));
}

#[tokio::test]
async fn open_missing_file_is_not_found() {
    let mut store = MockUploadStore::new();
    store
        .expect_load()
        .return_once(|_| Err(UploadStoreError::not_found("gone.png")));

    let err = service_with_store(store)
        .open("gone.png")
        .await
        .expect_err("missing");
    assert_eq!(err.code, ErrorCode::NotFound);
    assert_eq!(err.message, "File not found");
}
