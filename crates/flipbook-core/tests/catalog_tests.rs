use flipbook_core::*;
use std::collections::HashMap;
use std::sync::Mutex;

/// Resolver answering from a fixed table, recording every lookup
struct MockResolver {
    responses: HashMap<String, HeadCheck>,
    checked: Mutex<Vec<String>>,
}

impl MockResolver {
    fn with_images(config: &CatalogConfig, count: usize) -> Self {
        let responses = (0..count)
            .map(|i| (config.page_id(i).to_string(), HeadCheck::found("image/jpeg")))
            .collect();
        Self {
            responses,
            checked: Mutex::new(Vec::new()),
        }
    }

    fn insert(&mut self, page: PageId, check: HeadCheck) {
        self.responses.insert(page.to_string(), check);
    }

    fn check_count(&self) -> usize {
        self.checked.lock().unwrap().len()
    }
}

impl AssetResolver for MockResolver {
    async fn head_check(&self, page: &PageId) -> HeadCheck {
        self.checked.lock().unwrap().push(page.to_string());
        self.responses.get(page.as_str()).cloned().unwrap_or_default()
    }

    async fn fetch(&self, page: &PageId) -> Result<Vec<u8>> {
        Ok(page.as_str().as_bytes().to_vec())
    }
}

#[test]
fn test_page_id_naming() {
    let config = CatalogConfig::default();
    assert_eq!(config.page_id(0).as_str(), "assets/page_00.jpg");
    assert_eq!(config.page_id(7).as_str(), "assets/page_07.jpg");
    assert_eq!(config.page_id(123).as_str(), "assets/page_123.jpg");

    let config = CatalogConfig {
        base_path: "https://example.com/book/".to_string(),
        file_prefix: "p".to_string(),
        file_extension: ".png".to_string(),
        number_padding: 4,
        ..Default::default()
    };
    assert_eq!(
        config.page_id(12).as_str(),
        "https://example.com/book/p0012.png"
    );

    let config = CatalogConfig::with_base("");
    assert_eq!(config.page_id(1).as_str(), "page_01.jpg");
}

#[tokio::test]
async fn test_discover_stops_at_first_missing_page() {
    let config = CatalogConfig::default();
    let resolver = MockResolver::with_images(&config, 5);

    let pages = discover(&config, &resolver).await;

    assert_eq!(pages.len(), 5);
    let expected: Vec<PageId> = (0..5).map(|i| config.page_id(i)).collect();
    assert_eq!(pages, expected);
    // Pages 0-4 plus the missing page 5
    assert_eq!(resolver.check_count(), 6);
}

#[tokio::test]
async fn test_discover_does_not_skip_gaps() {
    let config = CatalogConfig::default();
    let mut resolver = MockResolver::with_images(&config, 3);
    resolver.insert(config.page_id(4), HeadCheck::found("image/jpeg"));

    let pages = discover(&config, &resolver).await;
    assert_eq!(pages.len(), 3);
}

#[tokio::test]
async fn test_discover_empty_when_first_page_missing() {
    let config = CatalogConfig::default();
    let resolver = MockResolver::with_images(&config, 0);

    let pages = discover(&config, &resolver).await;
    assert!(pages.is_empty());

    let result = PageCatalog::discover(&config, &resolver).await;
    match result {
        Err(FlipbookError::NotFound(base)) => assert_eq!(base, "assets"),
        other => panic!("Expected NotFound error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_content_type_check_rejects_catch_all_pages() {
    let config = CatalogConfig::default();
    let mut resolver = MockResolver::with_images(&config, 2);
    // A catch-all server answering 200 with its index page
    resolver.insert(config.page_id(2), HeadCheck::found("text/html; charset=utf-8"));
    resolver.insert(config.page_id(3), HeadCheck::found("text/html; charset=utf-8"));

    let pages = discover(&config, &resolver).await;
    assert_eq!(pages.len(), 2);

    let status_only = CatalogConfig {
        existence_check: ExistenceCheck::StatusOnly,
        ..config.clone()
    };
    let pages = discover(&status_only, &resolver).await;
    assert_eq!(pages.len(), 4);
}

#[tokio::test]
async fn test_failed_status_counts_as_missing() {
    let config = CatalogConfig::default();
    let mut resolver = MockResolver::with_images(&config, 2);
    resolver.insert(
        config.page_id(2),
        HeadCheck {
            ok: false,
            content_type: Some("image/jpeg".to_string()),
        },
    );

    let pages = discover(&config, &resolver).await;
    assert_eq!(pages.len(), 2);
}

#[tokio::test]
async fn test_discover_respects_page_limit() {
    let config = CatalogConfig {
        max_pages: 10,
        ..Default::default()
    };
    let resolver = MockResolver::with_images(&config, 50);

    let pages = discover(&config, &resolver).await;
    assert_eq!(pages.len(), 10);
    assert_eq!(resolver.check_count(), 10);
}

#[tokio::test]
async fn test_catalog_lookup_by_page_number() {
    let config = CatalogConfig::default();
    let resolver = MockResolver::with_images(&config, 3);

    let catalog = PageCatalog::discover(&config, &resolver).await.unwrap();
    assert_eq!(catalog.len(), 3);
    assert_eq!(catalog.page(1), Some(&config.page_id(0)));
    assert_eq!(catalog.page(3), Some(&config.page_id(2)));
    assert_eq!(catalog.page(0), None);
    assert_eq!(catalog.page(4), None);
}

#[test]
fn test_head_check_image_detection() {
    assert!(HeadCheck::found("image/png").is_image());
    assert!(HeadCheck::found("IMAGE/JPEG").is_image());
    assert!(!HeadCheck::found("text/html").is_image());
    assert!(!HeadCheck::missing().is_image());
}

#[tokio::test]
async fn test_fs_resolver_discovers_directory() {
    let dir = tempfile::tempdir().unwrap();
    for i in 0..4 {
        std::fs::write(dir.path().join(format!("page_{:02}.jpg", i)), b"jpeg").unwrap();
    }
    // Not part of the sequence
    std::fs::write(dir.path().join("page_05.jpg"), b"jpeg").unwrap();

    let config = CatalogConfig::with_base(dir.path().to_string_lossy());
    let catalog = PageCatalog::discover(&config, &FsResolver).await.unwrap();

    assert_eq!(catalog.len(), 4);
    let bytes = FsResolver.fetch(catalog.page(1).unwrap()).await.unwrap();
    assert_eq!(bytes, b"jpeg");
}

#[tokio::test]
async fn test_fs_resolver_applies_content_type_check() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("page_00.txt"), b"not an image").unwrap();

    let config = CatalogConfig {
        base_path: dir.path().to_string_lossy().into_owned(),
        file_extension: ".txt".to_string(),
        ..Default::default()
    };
    assert!(discover(&config, &FsResolver).await.is_empty());

    let config = CatalogConfig {
        existence_check: ExistenceCheck::StatusOnly,
        ..config
    };
    assert_eq!(discover(&config, &FsResolver).await.len(), 1);
}

#[test]
fn test_resolver_selection_by_base() {
    assert!(matches!(
        AnyResolver::for_base("https://example.com/assets").unwrap(),
        AnyResolver::Http(_)
    ));
    assert!(matches!(
        AnyResolver::for_base("./assets").unwrap(),
        AnyResolver::Fs(_)
    ));
    assert!(matches!(
        AnyResolver::for_base("http://"),
        Err(FlipbookError::InvalidBase(_))
    ));
}
