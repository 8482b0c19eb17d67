//! Typed read-only access to the well-known lockfile sections.

use crate::interpret::BUNDLED_WITH;
use crate::tree::{Entry, Node};

/// Sections that list resolved gems under a `specs` key.
pub const SOURCE_SECTIONS: [&str; 3] = ["GEM", "GIT", "PATH"];

/// A resolved gem listed under a source section's `specs`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Spec<'a> {
    /// Gem name.
    pub name: &'a str,
    /// Resolved version, possibly with a platform suffix.
    pub version: Option<&'a str>,
    /// Source section the gem was listed under (`GEM`, `GIT` or `PATH`).
    pub section: &'static str,
    /// Runtime requirements nested under the gem.
    pub requirements: Vec<Requirement<'a>>,
}

/// A named requirement with an optional version constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Requirement<'a> {
    /// Name of the required gem.
    pub name: &'a str,
    /// Version constraint, e.g. `>= 2.2.4`.
    pub constraint: Option<&'a str>,
}

/// A top-level dependency from the `DEPENDENCIES` section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dependency<'a> {
    /// Gem name, without a trailing `!`.
    pub name: &'a str,
    /// Version constraint from the Gemfile, e.g. `~> 13.0`.
    pub constraint: Option<&'a str>,
    /// Pinned to a git or path source (`name!` or a trailing `!`).
    pub pinned: bool,
}

/// View over an interpreted lockfile tree.
#[derive(Debug, Clone, Copy)]
pub struct Lockfile<'a> {
    tree: &'a Node,
}

impl<'a> Lockfile<'a> {
    /// Wraps an interpreted tree.
    #[must_use]
    pub fn new(tree: &'a Node) -> Self {
        Self { tree }
    }

    /// The underlying tree.
    #[must_use]
    pub fn tree(&self) -> &'a Node {
        self.tree
    }

    fn section(&self, name: &str) -> Option<&'a Node> {
        self.tree.get(name).and_then(Entry::as_node)
    }

    /// Remote URLs or paths declared by the source sections.
    ///
    /// Only remotes that were classified as paths are reported; a bare `.`
    /// carries no `/` and is skipped.
    #[must_use]
    pub fn remotes(&self) -> Vec<&'a str> {
        SOURCE_SECTIONS
            .into_iter()
            .filter_map(|section| self.section(section)?.get("remote"))
            .filter_map(|entry| entry.attributes()?.path.as_deref())
            .collect()
    }

    /// Git revision of the `GIT` section, if any.
    #[must_use]
    pub fn git_revision(&self) -> Option<&'a str> {
        self.section("GIT")?
            .get("revision")?
            .attributes()?
            .sha
            .as_deref()
    }

    /// All gems listed under the source sections, in section order.
    #[must_use]
    pub fn specs(&self) -> Vec<Spec<'a>> {
        let mut specs = Vec::new();
        for section in SOURCE_SECTIONS {
            let Some(listed) = self
                .section(section)
                .and_then(|node| node.get("specs"))
                .and_then(Entry::as_node)
            else {
                continue;
            };

            for (name, entry) in listed.iter() {
                let requirements: Vec<Requirement<'a>> = entry
                    .as_node()
                    .map(|node| {
                        node.iter()
                            .map(|(name, req)| Requirement {
                                name,
                                constraint: req.version(),
                            })
                            .collect()
                    })
                    .unwrap_or_default();

                specs.push(Spec {
                    name,
                    version: entry.version(),
                    section,
                    requirements,
                });
            }
        }
        specs
    }

    /// Looks up a gem by name across the source sections.
    #[must_use]
    pub fn spec(&self, name: &str) -> Option<Spec<'a>> {
        self.specs().into_iter().find(|spec| spec.name == name)
    }

    /// Platform names from the `PLATFORMS` section.
    #[must_use]
    pub fn platforms(&self) -> Vec<&'a str> {
        self.section("PLATFORMS")
            .map(|node| node.keys().collect())
            .unwrap_or_default()
    }

    /// Top-level dependencies from the `DEPENDENCIES` section.
    #[must_use]
    pub fn dependencies(&self) -> Vec<Dependency<'a>> {
        let Some(section) = self.section("DEPENDENCIES") else {
            return Vec::new();
        };

        section
            .iter()
            .map(|(key, entry)| {
                let (name, bang) = match key.strip_suffix('!') {
                    Some(name) => (name, true),
                    None => (key, false),
                };
                let outsourced = entry.attributes().is_some_and(|leaf| leaf.outsourced);
                Dependency {
                    name,
                    constraint: entry.version(),
                    pinned: bang || outsourced,
                }
            })
            .collect()
    }

    /// Bundler version from the collapsed `BUNDLED WITH` section.
    #[must_use]
    pub fn bundled_with(&self) -> Option<&'a str> {
        self.tree.get(BUNDLED_WITH)?.as_scalar()
    }

    /// The `RUBY VERSION` line, e.g. `ruby 3.2.2p53`.
    #[must_use]
    pub fn ruby_version(&self) -> Option<&'a str> {
        self.section("RUBY VERSION")?.keys().next()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpret::interpret;

    const LOCKFILE: &str = "\
GIT
  remote: https://github.com/rails/rails.git
  revision: 3e7e4ee2e2b5c6f8bb0f94f47a8bd2a4cdb5a3e1
  specs:
    rails (7.1.0.alpha)
      actionpack (= 7.1.0.alpha)

PATH
  remote: .
  specs:
    local_gem (0.1.0)

GEM
  remote: https://rubygems.org/
  specs:
    actionpack (7.1.0.alpha)
      rack (>= 2.2.4)
    rack (3.0.8)
    rake (13.0.6)

PLATFORMS
  ruby
  x86_64-linux

DEPENDENCIES
  local_gem!
  rails!
  rake (~> 13.0)

RUBY VERSION
   ruby 3.2.2p53

BUNDLED WITH
   2.4.10
";

    #[test]
    fn reads_remotes_and_revision() {
        let tree = interpret(LOCKFILE);
        let lock = Lockfile::new(&tree);
        assert_eq!(
            lock.remotes(),
            ["https://rubygems.org/", "https://github.com/rails/rails.git"]
        );
        assert_eq!(
            lock.git_revision(),
            Some("3e7e4ee2e2b5c6f8bb0f94f47a8bd2a4cdb5a3e1")
        );
    }

    #[test]
    fn lists_specs_across_sections() {
        let tree = interpret(LOCKFILE);
        let lock = Lockfile::new(&tree);
        let names: Vec<_> = lock.specs().iter().map(|s| (s.section, s.name)).collect();
        assert_eq!(
            names,
            [
                ("GEM", "actionpack"),
                ("GEM", "rack"),
                ("GEM", "rake"),
                ("GIT", "rails"),
                ("PATH", "local_gem"),
            ]
        );

        let actionpack = lock.spec("actionpack").unwrap();
        assert_eq!(actionpack.version, Some("7.1.0.alpha"));
        assert_eq!(
            actionpack.requirements,
            [Requirement {
                name: "rack",
                constraint: Some(">= 2.2.4"),
            }]
        );
        assert!(lock.spec("rake").unwrap().requirements.is_empty());
        assert!(lock.spec("nokogiri").is_none());
    }

    #[test]
    fn reads_platforms_and_dependencies() {
        let tree = interpret(LOCKFILE);
        let lock = Lockfile::new(&tree);
        assert_eq!(lock.platforms(), ["ruby", "x86_64-linux"]);
        assert_eq!(
            lock.dependencies(),
            [
                Dependency {
                    name: "local_gem",
                    constraint: None,
                    pinned: true,
                },
                Dependency {
                    name: "rails",
                    constraint: None,
                    pinned: true,
                },
                Dependency {
                    name: "rake",
                    constraint: Some("~> 13.0"),
                    pinned: false,
                },
            ]
        );
    }

    #[test]
    fn reads_versions() {
        let tree = interpret(LOCKFILE);
        let lock = Lockfile::new(&tree);
        assert_eq!(lock.bundled_with(), Some("2.4.10"));
        assert_eq!(lock.ruby_version(), Some("ruby 3.2.2p53"));
    }

    #[test]
    fn empty_tree_has_nothing() {
        let tree = Node::new();
        let lock = Lockfile::new(&tree);
        assert!(lock.remotes().is_empty());
        assert!(lock.specs().is_empty());
        assert!(lock.platforms().is_empty());
        assert!(lock.dependencies().is_empty());
        assert!(lock.bundled_with().is_none());
        assert!(lock.ruby_version().is_none());
        assert!(lock.git_revision().is_none());
    }
}
