//! End-to-end candidate building through the git CLI

use permalinker::config::Config;
use permalinker::git::CliGit;
use permalinker::{
    LinkKind, RepositoryType, Request, ResolutionError, SelectedLines, build_permalink_candidates,
};
use pretty_assertions::assert_eq;

use crate::common::{TestFixture, skip_if_no_git};

fn urls(request: &Request, config: &Config) -> Result<Vec<String>, ResolutionError> {
    let candidates = build_permalink_candidates(&CliGit::default(), request, config)?;
    Ok(candidates.into_iter().map(|c| c.url).collect())
}

fn pinned_to_branches() -> Config {
    Config {
        exclude_current_revision: true,
        ..Config::default()
    }
}

#[test]
fn test_pushed_default_branch_links_default_remote() -> Result<(), Box<dyn std::error::Error>> {
    if skip_if_no_git() {
        return Ok(());
    }
    let fixture = TestFixture::new()?;
    fixture.add_remote("origin", "git@github.com:owner/repo.git")?;
    fixture.publish("origin", "master")?;

    let request = Request::for_file(
        &fixture.file("src/lib.rs"),
        Some(SelectedLines::range(3, 5)?),
        LinkKind::File,
    )?;

    assert_eq!(
        urls(&request, &pinned_to_branches())?,
        vec!["https://github.com/owner/repo/blob/master/src/lib.rs#L3-L5".to_string()]
    );
    Ok(())
}

#[test]
fn test_current_revision_is_offered_after_branches() -> Result<(), Box<dyn std::error::Error>> {
    if skip_if_no_git() {
        return Ok(());
    }
    let fixture = TestFixture::new()?;
    fixture.add_remote("origin", "https://github.com/owner/repo")?;
    fixture.publish("origin", "master")?;
    let sha = fixture.head_sha()?;

    let request = Request::for_file(&fixture.file("README.md"), None, LinkKind::File)?;

    assert_eq!(
        urls(&request, &Config::default())?,
        vec![
            "https://github.com/owner/repo/blob/master/README.md".to_string(),
            format!("https://github.com/owner/repo/blob/{sha}/README.md"),
        ]
    );
    Ok(())
}

#[test]
fn test_feature_branch_interleaves_remotes() -> Result<(), Box<dyn std::error::Error>> {
    if skip_if_no_git() {
        return Ok(());
    }
    let fixture = TestFixture::new()?;
    fixture.add_remote("origin", "git@github.com:owner/repo.git")?;
    fixture.add_remote("upstream", "git@bitbucket.org:team/repo.git")?;
    fixture.publish("origin", "master")?;
    fixture.checkout_new_branch("feature/links")?;
    fixture.publish("origin", "feature/links")?;

    let request = Request::for_file(
        &fixture.file("src/lib.rs"),
        Some(SelectedLines::single(4)?),
        LinkKind::File,
    )?;
    let candidates =
        build_permalink_candidates(&CliGit::default(), &request, &pinned_to_branches())?;

    let details: Vec<&str> = candidates.iter().map(|c| c.detail.as_str()).collect();
    assert_eq!(
        details,
        vec![
            "feature/links | https://github.com/owner/repo",
            "master | https://github.com/owner/repo",
            "feature/links | https://bitbucket.org/team/repo",
            "master | https://bitbucket.org/team/repo",
        ]
    );
    assert_eq!(
        candidates[2].url,
        "https://bitbucket.org/team/repo/src/feature/links/src/lib.rs#lib.rs-4"
    );
    assert!(candidates.iter().all(|c| c.label == "src/lib.rs"));
    assert!(candidates.iter().all(|c| c.description == "[File]"));
    Ok(())
}

#[test]
fn test_local_only_branch_is_skipped() -> Result<(), Box<dyn std::error::Error>> {
    if skip_if_no_git() {
        return Ok(());
    }
    let fixture = TestFixture::new()?;
    fixture.add_remote("origin", "https://github.com/owner/repo.git")?;
    fixture.publish("origin", "master")?;
    fixture.checkout_new_branch("wip")?;

    let request = Request::for_file(&fixture.file("README.md"), None, LinkKind::Blame)?;

    assert_eq!(
        urls(&request, &pinned_to_branches())?,
        vec!["https://github.com/owner/repo/blame/master/README.md".to_string()]
    );
    Ok(())
}

#[test]
fn test_nothing_pushed_yields_no_candidates() -> Result<(), Box<dyn std::error::Error>> {
    if skip_if_no_git() {
        return Ok(());
    }
    let fixture = TestFixture::new()?;
    fixture.add_remote("origin", "https://github.com/owner/repo.git")?;

    let request = Request::for_file(&fixture.file("README.md"), None, LinkKind::File)?;

    assert!(urls(&request, &pinned_to_branches())?.is_empty());
    Ok(())
}

#[test]
fn test_bitbucket_server_repository_type() -> Result<(), Box<dyn std::error::Error>> {
    if skip_if_no_git() {
        return Ok(());
    }
    let fixture = TestFixture::new()?;
    fixture.add_remote("origin", "ssh://git@git.example.com:7999/proj/repo.git")?;
    fixture.publish("origin", "master")?;

    let request = Request::for_file(
        &fixture.file("src/lib.rs"),
        Some(SelectedLines::range(3, 5)?),
        LinkKind::File,
    )?;
    let config = Config {
        repository_type: RepositoryType::BitbucketServer,
        ..pinned_to_branches()
    };

    assert_eq!(
        urls(&request, &config)?,
        vec![
            "https://git.example.com/projects/proj/repos/repo/browse/src/lib.rs?at=master#3-5"
                .to_string()
        ]
    );
    Ok(())
}

#[test]
fn test_default_branch_setting_is_honored() -> Result<(), Box<dyn std::error::Error>> {
    if skip_if_no_git() {
        return Ok(());
    }
    let fixture = TestFixture::new()?;
    fixture.add_remote("origin", "https://github.com/owner/repo")?;
    fixture.checkout_new_branch("main")?;
    fixture.publish("origin", "main")?;

    let request = Request::for_file(&fixture.file("README.md"), None, LinkKind::History)?;
    let config = Config {
        default_branch: "main".to_string(),
        ..pinned_to_branches()
    };

    assert_eq!(
        urls(&request, &config)?,
        vec!["https://github.com/owner/repo/commits/main/README.md".to_string()]
    );
    Ok(())
}

#[test]
fn test_file_outside_repository_fails() -> Result<(), Box<dyn std::error::Error>> {
    if skip_if_no_git() {
        return Ok(());
    }
    let outside = tempfile::TempDir::new()?;
    let file = outside.path().join("notes.txt");
    std::fs::write(&file, "not tracked\n")?;

    let request = Request::for_file(&file, None, LinkKind::File)?;
    let result = build_permalink_candidates(&CliGit::default(), &request, &Config::default());

    assert!(matches!(result, Err(ResolutionError::Exec(_))));
    Ok(())
}

#[test]
fn test_branch_listing_over_limit_fails() -> Result<(), Box<dyn std::error::Error>> {
    if skip_if_no_git() {
        return Ok(());
    }
    let fixture = TestFixture::new()?;
    fixture.add_remote("origin", "https://github.com/owner/repo")?;
    fixture.publish("origin", "master")?;

    let request = Request::for_file(&fixture.file("README.md"), None, LinkKind::File)?;
    let config = Config {
        max_buffer: Some(4),
        ..Config::default()
    };

    let result = build_permalink_candidates(&CliGit::default(), &request, &config);
    assert!(matches!(result, Err(ResolutionError::Exec(_))));
    Ok(())
}
