//  ██████╗  █████╗ ███████╗███████╗██╗███╗   ██╗ ██████╗
//  ██╔══██╗██╔══██╗██╔════╝██╔════╝██║████╗  ██║██╔════╝
//  ██████╔╝███████║███████╗███████╗██║██╔██╗ ██║██║  ███╗
//  ██╔═══╝ ██╔══██║╚════██║╚════██║██║██║╚██╗██║██║   ██║
//  ██║     ██║  ██║███████║███████║██║██║ ╚████║╚██████╔╝
//  ╚═╝     ╚═╝  ╚═╝╚══════╝╚══════╝╚═╝╚═╝  ╚═══╝ ╚═════╝

#[cfg(test)]
mod passing {
    use std::sync::Arc;

    use webarchiver::builders::read_webarchive;
    use webarchiver::core::{ArchiveOptions, Archiver};

    use crate::common::{fixture_html, sorted, MockTransport, FIXTURE_RESOURCES, FIXTURE_URL};

    fn archiver(transport: MockTransport) -> Archiver {
        Archiver::with_transport(Arc::new(transport), ArchiveOptions::default())
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn archives_page_and_every_resource() {
        let page = archiver(MockTransport::fixture())
            .archive_page(FIXTURE_URL)
            .await
            .unwrap();

        assert!(page.data.starts_with(b"bplist00"));
        assert_eq!(page.metadata.title.as_deref(), Some("This is a test"));

        let document = read_webarchive(&page.data).unwrap();
        assert_eq!(document.main_resource.url, FIXTURE_URL);
        assert_eq!(document.main_resource.mime_type, "text/html");
        assert_eq!(document.main_resource.text_encoding, "UTF-8");
        assert_eq!(document.main_resource.frame_name, "");
        assert_eq!(document.main_resource.data, fixture_html());

        let urls: Vec<&str> = document
            .subresources
            .iter()
            .map(|resource| resource.url.as_str())
            .collect();
        assert_eq!(urls, sorted(&FIXTURE_RESOURCES));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn subresources_keep_content_and_mime_type() {
        let page = archiver(MockTransport::fixture())
            .archive_page(FIXTURE_URL)
            .await
            .unwrap();
        let document = read_webarchive(&page.data).unwrap();

        for resource in &document.subresources {
            assert_eq!(resource.data, resource.url.as_bytes());
            let expected = if resource.url.ends_with(".js") {
                "application/javascript"
            } else if resource.url.ends_with(".css") {
                "text/css"
            } else {
                "image/jpeg"
            };
            assert_eq!(resource.mime_type.as_deref(), Some(expected));
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn failed_resources_are_left_out() {
        let transport = MockTransport::fixture()
            .with_status("http://2.com/2/2.js", 404)
            .with_status("http://2.com/assets/images/avatar.jpg", 500)
            .without("https://1.com/1/1.js");

        let page = archiver(transport).archive_page(FIXTURE_URL).await.unwrap();
        let document = read_webarchive(&page.data).unwrap();

        let urls: Vec<&str> = document
            .subresources
            .iter()
            .map(|resource| resource.url.as_str())
            .collect();
        assert_eq!(urls.len(), 6);
        assert!(!urls.contains(&"http://2.com/2/2.js"));
        assert!(!urls.contains(&"http://2.com/assets/images/avatar.jpg"));
        assert!(!urls.contains(&"https://1.com/1/1.js"));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn all_resources_failing_still_archives_page() {
        let mut transport = MockTransport::fixture();
        for url in FIXTURE_RESOURCES {
            transport = transport.without(url);
        }

        let page = archiver(transport).archive_page(FIXTURE_URL).await.unwrap();
        let document = read_webarchive(&page.data).unwrap();

        assert!(document.subresources.is_empty());
        assert_eq!(document.main_resource.data, fixture_html());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn completion_order_does_not_change_archive() {
        let first = archiver(MockTransport::fixture().with_latency(20))
            .archive_page(FIXTURE_URL)
            .await
            .unwrap();
        let second = archiver(MockTransport::fixture().with_latency(20))
            .archive_page(FIXTURE_URL)
            .await
            .unwrap();

        assert_eq!(first, second);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn serial_fetching_gives_same_archive() {
        let serial = Archiver::with_transport(
            Arc::new(MockTransport::fixture()),
            ArchiveOptions {
                max_concurrent_fetches: 1,
                ..ArchiveOptions::default()
            },
        )
        .archive_page(FIXTURE_URL)
        .await
        .unwrap();
        let unbounded = Archiver::with_transport(
            Arc::new(MockTransport::fixture()),
            ArchiveOptions {
                max_concurrent_fetches: 0,
                ..ArchiveOptions::default()
            },
        )
        .archive_page(FIXTURE_URL)
        .await
        .unwrap();

        assert_eq!(serial, unbounded);
    }

    #[tokio::test]
    async fn disabled_kinds_are_not_fetched() {
        let transport = Arc::new(MockTransport::fixture());
        let archiver = Archiver::with_transport(
            transport.clone(),
            ArchiveOptions {
                no_images: true,
                no_css: true,
                ..ArchiveOptions::default()
            },
        );

        archiver.archive_page(FIXTURE_URL).await.unwrap();

        let mut requests = transport.requests();
        requests.sort();
        assert_eq!(
            requests,
            sorted(&[
                FIXTURE_URL,
                "https://1.com/1/1.js",
                "http://2.com/2/2.js",
                "https://100.com/3/3.js",
            ])
        );
    }

    #[test]
    fn blocking_variant() {
        let page = archiver(MockTransport::fixture())
            .archive_page_blocking(FIXTURE_URL)
            .unwrap();

        assert_eq!(page.metadata.title.as_deref(), Some("This is a test"));
        assert_eq!(read_webarchive(&page.data).unwrap().subresources.len(), 9);
    }
}

//  ███████╗ █████╗ ██╗██╗     ██╗███╗   ██╗ ██████╗
//  ██╔════╝██╔══██╗██║██║     ██║████╗  ██║██╔════╝
//  █████╗  ███████║██║██║     ██║██╔██╗ ██║██║  ███╗
//  ██╔══╝  ██╔══██║██║██║     ██║██║╚██╗██║██║   ██║
//  ██║     ██║  ██║██║███████╗██║██║ ╚████║╚██████╔╝
//  ╚═╝     ╚═╝  ╚═╝╚═╝╚══════╝╚═╝╚═╝  ╚═══╝ ╚═════╝

#[cfg(test)]
mod failing {
    use std::sync::Arc;

    use tokio_util::sync::CancellationToken;
    use webarchiver::core::{ArchiveErrorKind, ArchiveOptions, Archiver};

    use crate::common::{MockTransport, FIXTURE_URL};

    #[tokio::test]
    async fn main_page_error_fails_whole_operation() {
        let transport = Arc::new(MockTransport::fixture().with_status(FIXTURE_URL, 404));
        let error = Archiver::with_transport(transport.clone(), ArchiveOptions::default())
            .archive_page(FIXTURE_URL)
            .await
            .unwrap_err();

        assert_eq!(error.kind(), ArchiveErrorKind::FetchHtmlError);
        assert_eq!(transport.requests(), vec![FIXTURE_URL.to_string()]);
    }

    #[tokio::test]
    async fn invalid_url() {
        let error = Archiver::with_transport(
            Arc::new(MockTransport::fixture()),
            ArchiveOptions::default(),
        )
        .archive_page("")
        .await
        .unwrap_err();

        assert_eq!(error.kind(), ArchiveErrorKind::UrlInvalid);
    }

    #[tokio::test]
    async fn cancelled_before_start() {
        let cancellation = CancellationToken::new();
        cancellation.cancel();

        let transport = Arc::new(MockTransport::fixture());
        let error = Archiver::with_transport(transport.clone(), ArchiveOptions::default())
            .with_cancellation(cancellation)
            .archive_page(FIXTURE_URL)
            .await
            .unwrap_err();

        assert_eq!(error.kind(), ArchiveErrorKind::FetchHtmlError);
        assert!(transport.requests().is_empty());
    }
}
