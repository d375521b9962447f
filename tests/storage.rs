use pushkind_memes::domain::auth::AuthenticatedUser;
use pushkind_memes::domain::types::{ImageFormat, MediaPath};
use pushkind_memes::forms::ImageUpload;
use pushkind_memes::forms::memes::SaveMemeFormPayload;
use pushkind_memes::repository::MemeReader;
use pushkind_memes::services::memes::{delete_meme, save_meme};
use pushkind_memes::storage::{FileSystemStorage, MediaStorage};

mod common;

#[test]
fn stores_reads_and_removes_files_under_root() {
    let dir = tempfile::tempdir().expect("should create temp dir");
    let storage = FileSystemStorage::new(dir.path());
    let path = MediaPath::new("user_memes/meme_1_1.png").unwrap();

    storage.store(&path, b"png bytes").expect("should store");
    assert!(dir.path().join("user_memes").join("meme_1_1.png").is_file());
    assert_eq!(storage.read(&path).unwrap(), b"png bytes");

    storage.store(&path, b"new").expect("should overwrite");
    assert_eq!(storage.read(&path).unwrap(), b"new");

    storage.remove(&path).expect("should remove");
    assert!(storage.read(&path).is_err());
    storage.remove(&path).expect("removing a missing file is not an error");
}

#[test]
fn rapid_saves_never_share_an_image_file() {
    let test_db = common::TestDb::new();
    let repo = test_db.repo();
    let account = common::create_user(&repo, "arnold");
    let user = AuthenticatedUser::from(&account);
    let dir = tempfile::tempdir().expect("should create temp dir");
    let storage = FileSystemStorage::new(dir.path());

    for i in 0..5u8 {
        for byte in [i, i + 100] {
            let payload = SaveMemeFormPayload {
                image: ImageUpload {
                    format: ImageFormat::Png,
                    bytes: vec![byte],
                },
                name: None,
                template_id: None,
            };
            save_meme(payload, &user, &repo, &storage).expect("should save meme");
        }
    }

    let memes = repo.list_memes(account.id).expect("should list memes");
    assert_eq!(memes.len(), 10);
    let mut paths: Vec<_> = memes
        .iter()
        .map(|m| m.custom_image.clone().expect("meme has an image"))
        .collect();
    paths.sort();
    paths.dedup();
    assert_eq!(paths.len(), 10);

    let victim = memes[0].id.get();
    delete_meme(victim, &user, &repo, &storage).expect("should delete meme");
    for meme in repo.list_memes(account.id).expect("should list memes") {
        let path = meme.custom_image.expect("meme has an image");
        assert_eq!(storage.read(&path).expect("image survives").len(), 1);
    }
}
