use crate::maven::model::{Dependency, Parent, Profile, Project, Repository};
use crate::shared::{Result, ScanError};
use quick_xml::events::Event;
use quick_xml::Reader;

/// Parses raw POM bytes into a [`Project`].
///
/// The reader honours XML encoding declarations other than UTF-8.
/// Malformed markup and truncated input (open elements at end of file)
/// produce a [`ScanError::Parse`], which aborts extraction for that
/// manifest only.
pub fn parse_project(data: &[u8]) -> Result<Project> {
    let mut reader = Reader::from_reader(data);
    reader.config_mut().trim_text(true);

    let mut project = Project::default();
    let mut stack: Vec<String> = Vec::new();
    let mut buf = Vec::new();
    let mut saw_project = false;

    // Builders for the nested entries currently being read.
    let mut dependency: Option<Dependency> = None;
    let mut parent: Option<Parent> = None;
    let mut repository: Option<Repository> = None;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).to_string();
                if stack.is_empty() && name == "project" {
                    saw_project = true;
                }
                stack.push(name.clone());
                let path: Vec<&str> = stack.iter().map(String::as_str).collect();
                match name.as_str() {
                    "dependency" if in_dependency_list(&path) => {
                        dependency = Some(Dependency::default());
                    }
                    "parent" if path == ["project", "parent"] => {
                        parent = Some(Parent::default());
                    }
                    "repository" if in_repository_list(&path) => {
                        repository = Some(Repository::default());
                    }
                    "profile" if path == ["project", "profiles", "profile"] => {
                        project.profiles.push(Profile::default());
                    }
                    _ => {}
                }
            }
            Ok(Event::End(_)) => {
                let path: Vec<&str> = stack.iter().map(String::as_str).collect();
                match path.last().copied() {
                    Some("dependency") if in_dependency_list(&path) => {
                        if let Some(dep) = dependency.take() {
                            dependency_target(&mut project, &path).push(dep);
                        }
                    }
                    Some("parent") if path == ["project", "parent"] => {
                        project.parent = parent.take();
                    }
                    Some("repository") if in_repository_list(&path) => {
                        if let Some(repo) = repository.take() {
                            repository_target(&mut project, &path).push(repo);
                        }
                    }
                    _ => {}
                }
                stack.pop();
            }
            Ok(Event::Text(t)) => {
                let text = reader
                    .decoder()
                    .decode(t.as_ref())
                    .map_err(|e| ScanError::Parse {
                        path: String::new(),
                        details: e.to_string(),
                    })?
                    .trim()
                    .to_string();
                if text.is_empty() {
                    buf.clear();
                    continue;
                }
                let path: Vec<&str> = stack.iter().map(String::as_str).collect();
                assign_text(
                    &mut project,
                    &mut dependency,
                    &mut parent,
                    &mut repository,
                    &path,
                    text,
                );
            }
            Ok(Event::CData(t)) => {
                let text = reader
                    .decoder()
                    .decode(t.as_ref())
                    .map_err(|e| ScanError::Parse {
                        path: String::new(),
                        details: e.to_string(),
                    })?
                    .trim()
                    .to_string();
                if text.is_empty() {
                    buf.clear();
                    continue;
                }
                let path: Vec<&str> = stack.iter().map(String::as_str).collect();
                assign_text(
                    &mut project,
                    &mut dependency,
                    &mut parent,
                    &mut repository,
                    &path,
                    text,
                );
            }
            Ok(Event::Eof) => {
                if !stack.is_empty() {
                    return Err(ScanError::Parse {
                        path: String::new(),
                        details: format!("unexpected end of file inside <{}>", stack.join("/")),
                    }
                    .into());
                }
                if !saw_project {
                    return Err(ScanError::Parse {
                        path: String::new(),
                        details: "document contains no <project> element".to_string(),
                    }
                    .into());
                }
                break;
            }
            Ok(Event::Empty(e)) => {
                if stack.is_empty() && e.name().as_ref() == b"project" {
                    saw_project = true;
                }
            }
            Err(e) => {
                return Err(ScanError::Parse {
                    path: String::new(),
                    details: e.to_string(),
                }
                .into());
            }
            _ => {}
        }
        buf.clear();
    }

    Ok(project)
}

fn in_dependency_list(path: &[&str]) -> bool {
    matches!(
        path,
        ["project", "dependencies", "dependency", ..]
            | ["project", "dependencyManagement", "dependencies", "dependency", ..]
            | ["project", "profiles", "profile", "dependencies", "dependency", ..]
            | ["project", "profiles", "profile", "dependencyManagement", "dependencies", "dependency", ..]
    )
}

fn in_repository_list(path: &[&str]) -> bool {
    matches!(
        path,
        ["project", "repositories", "repository", ..]
            | ["project", "profiles", "profile", "repositories", "repository", ..]
    )
}

fn dependency_target<'a>(project: &'a mut Project, path: &[&str]) -> &'a mut Vec<Dependency> {
    let in_profile = path.get(1) == Some(&"profiles");
    let in_management = path.contains(&"dependencyManagement");
    if in_profile {
        let profile = project
            .profiles
            .last_mut()
            .expect("profile element opened before its dependencies");
        if in_management {
            &mut profile.dependency_management.dependencies
        } else {
            &mut profile.dependencies
        }
    } else if in_management {
        &mut project.dependency_management.dependencies
    } else {
        &mut project.dependencies
    }
}

fn repository_target<'a>(project: &'a mut Project, path: &[&str]) -> &'a mut Vec<Repository> {
    if path.get(1) == Some(&"profiles") {
        &mut project
            .profiles
            .last_mut()
            .expect("profile element opened before its repositories")
            .repositories
    } else {
        &mut project.repositories
    }
}

fn assign_text(
    project: &mut Project,
    dependency: &mut Option<Dependency>,
    parent: &mut Option<Parent>,
    repository: &mut Option<Repository>,
    path: &[&str],
    text: String,
) {
    if let Some(dep) = dependency.as_mut() {
        // Only direct children of <dependency> are fields of the entry;
        // nested elements such as <exclusions> must not leak into it.
        if path.len() >= 2 && path[path.len() - 2] == "dependency" {
            let field = path[path.len() - 1];
            match field {
                "groupId" => dep.group_id = text,
                "artifactId" => dep.artifact_id = text,
                "version" => dep.version = text,
                "scope" => dep.scope = text,
                "type" => dep.dep_type = text,
                "classifier" => dep.classifier = text,
                "optional" => dep.optional = text == "true",
                _ => {}
            }
        }
        return;
    }

    if let Some(p) = parent.as_mut() {
        match path {
            ["project", "parent", "groupId"] => p.key.group_id = text,
            ["project", "parent", "artifactId"] => p.key.artifact_id = text,
            ["project", "parent", "version"] => p.key.version = text,
            ["project", "parent", "relativePath"] => p.relative_path = text,
            _ => {}
        }
        return;
    }

    if let Some(repo) = repository.as_mut() {
        match path {
            [.., "repository", "id"] => repo.id = text,
            [.., "repository", "url"] => repo.url = text,
            [.., "releases", "enabled"] => repo.releases_enabled = text == "true",
            [.., "snapshots", "enabled"] => repo.snapshots_enabled = text == "true",
            _ => {}
        }
        return;
    }

    match path {
        ["project", "groupId"] => project.key.group_id = text,
        ["project", "artifactId"] => project.key.artifact_id = text,
        ["project", "version"] => project.key.version = text,
        ["project", "packaging"] => project.packaging = text,
        ["project", "properties", key] => {
            project.properties.insert((*key).to_string(), text);
        }
        ["project", "profiles", "profile", "id"] => {
            if let Some(profile) = project.profiles.last_mut() {
                profile.id = text;
            }
        }
        ["project", "profiles", "profile", "activation", "activeByDefault"] => {
            if let Some(profile) = project.profiles.last_mut() {
                profile.activation.active_by_default = text == "true";
            }
        }
        ["project", "profiles", "profile", "activation", "jdk"] => {
            if let Some(profile) = project.profiles.last_mut() {
                profile.activation.jdk = text;
            }
        }
        ["project", "profiles", "profile", "activation", "os", field] => {
            if let Some(profile) = project.profiles.last_mut() {
                match *field {
                    "name" => profile.activation.os.name = text,
                    "family" => profile.activation.os.family = text,
                    "arch" => profile.activation.os.arch = text,
                    "version" => profile.activation.os.version = text,
                    _ => {}
                }
            }
        }
        ["project", "profiles", "profile", "properties", key] => {
            if let Some(profile) = project.profiles.last_mut() {
                profile.properties.insert((*key).to_string(), text);
            }
        }
        _ => {}
    }
}

/// Convenience for callers that track the manifest path: attaches the
/// path to any parse failure.
pub fn parse_project_at(data: &[u8], path: &str) -> Result<Project> {
    parse_project(data).map_err(|e| match e.downcast::<ScanError>() {
        Ok(ScanError::Parse { details, .. }) => ScanError::Parse {
            path: path.to_string(),
            details,
        }
        .into(),
        Ok(other) => other.into(),
        Err(e) => e,
    })
}
