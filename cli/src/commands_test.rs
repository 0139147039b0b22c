use super::*;
use arena_lobby::model::AttachmentKind;

#[test]
fn plain_lines_are_chat_text() {
    assert_eq!(parse_input("gg\n"), Input::Text("gg".to_owned()));
    assert_eq!(parse_input(""), Input::Text(String::new()));
    assert_eq!(parse_input("//shrug"), Input::Text("/shrug".to_owned()));
}

#[test]
fn slash_commands_parse() {
    assert_eq!(parse_input("/call"), Input::Call);
    assert_eq!(parse_input("/quit"), Input::Quit);
    assert_eq!(parse_input("/exit"), Input::Quit);
    assert_eq!(parse_input("/detach"), Input::Detach);
    assert_eq!(parse_input("/help"), Input::Help);
    assert_eq!(
        parse_input("/attach ./map.png"),
        Input::Attach { path: PathBuf::from("./map.png"), media_type: None }
    );
    assert_eq!(
        parse_input("/attach blob.bin image/png"),
        Input::Attach { path: PathBuf::from("blob.bin"), media_type: Some("image/png".to_owned()) }
    );
}

#[test]
fn malformed_commands_are_unknown() {
    assert_eq!(parse_input("/attach"), Input::Unknown("/attach".to_owned()));
    assert_eq!(parse_input("/dance now"), Input::Unknown("/dance now".to_owned()));
    assert_eq!(parse_input("/"), Input::Unknown("/".to_owned()));
}

#[test]
fn media_type_follows_extension() {
    assert_eq!(guess_media_type(Path::new("a/MAP.PNG")), "image/png");
    assert_eq!(guess_media_type(Path::new("shot.jpeg")), "image/jpeg");
    assert_eq!(guess_media_type(Path::new("scan.tiff")), "image/tiff");
    assert_eq!(guess_media_type(Path::new("notes.txt")), "text/plain");
    assert_eq!(guess_media_type(Path::new("scores.csv")), "text/csv");
    assert_eq!(guess_media_type(Path::new("clip.mp4")), "video/mp4");
    assert_eq!(guess_media_type(Path::new("Makefile")), "application/octet-stream");
}

#[test]
fn load_attachment_classifies_by_media_type() {
    let dir = std::env::temp_dir().join(format!("lobby-cli-attach-{}", std::process::id()));
    std::fs::create_dir_all(&dir).expect("temp dir");
    let image = dir.join("map.png");
    let notes = dir.join("notes.txt");
    std::fs::write(&image, b"png").expect("write image");
    std::fs::write(&notes, b"hi").expect("write notes");

    let attachment = load_attachment(&image, None).expect("image loads");
    assert_eq!(attachment.name, "map.png");
    assert_eq!(attachment.kind, AttachmentKind::Image);
    assert!(attachment.url.as_deref().is_some_and(|url| url.starts_with("file://")));

    let attachment = load_attachment(&notes, None).expect("notes load");
    assert_eq!(attachment.kind, AttachmentKind::File);
    assert!(attachment.url.is_none());

    let scan = dir.join("scan.tiff");
    std::fs::write(&scan, b"tiff").expect("write scan");
    let attachment = load_attachment(&scan, None).expect("scan loads");
    assert_eq!(attachment.kind, AttachmentKind::Image);

    let forced = load_attachment(&notes, Some("image/png")).expect("override loads");
    assert_eq!(forced.kind, AttachmentKind::Image);

    std::fs::remove_dir_all(&dir).expect("cleanup");
}

#[test]
fn load_attachment_rejects_missing_and_directories() {
    let missing = std::env::temp_dir().join("lobby-cli-definitely-missing.bin");
    assert!(matches!(load_attachment(&missing, None), Err(CliError::Attachment { .. })));
    assert!(matches!(load_attachment(&std::env::temp_dir(), None), Err(CliError::NotAFile(_))));
}
