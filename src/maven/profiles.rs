use crate::maven::model::{ActivationOs, Profile, Project};
use crate::shared::Result;

impl Profile {
    /// Whether this profile's activation conditions match the given JDK
    /// and operating-system filters. Empty filters select only the
    /// profiles marked `activeByDefault`.
    fn is_active(&self, jdk: &str, os: &ActivationOs) -> bool {
        if jdk.is_empty() && os.is_empty() {
            return self.activation.active_by_default;
        }

        let jdk_match = !self.activation.jdk.is_empty() && jdk.starts_with(&self.activation.jdk);

        let os_cond = &self.activation.os;
        let os_match = !os_cond.is_empty()
            && (os_cond.name.is_empty() || os_cond.name.eq_ignore_ascii_case(&os.name))
            && (os_cond.family.is_empty() || os_cond.family.eq_ignore_ascii_case(&os.family))
            && (os_cond.arch.is_empty() || os_cond.arch.eq_ignore_ascii_case(&os.arch))
            && (os_cond.version.is_empty() || os_cond.version == os.version);

        self.activation.active_by_default || jdk_match || os_match
    }
}

impl Project {
    /// Merges matching activation profiles into the base project.
    ///
    /// The profile list is drained, so calling this again merges nothing
    /// new and the operation cannot double-apply contributions. Profiles
    /// contributed later by a merged parent are picked up by the next
    /// call during the parent walk.
    pub fn merge_profiles(&mut self, jdk: &str, os: &ActivationOs) -> Result<()> {
        let profiles = std::mem::take(&mut self.profiles);
        for profile in profiles {
            if !profile.is_active(jdk, os) {
                continue;
            }
            self.dependencies.extend(profile.dependencies);
            self.dependency_management
                .dependencies
                .extend(profile.dependency_management.dependencies);
            for repo in profile.repositories {
                if !self.repositories.iter().any(|r| r.url == repo.url) {
                    self.repositories.push(repo);
                }
            }
            for (key, value) in profile.properties {
                self.properties.insert(key, value);
            }
        }
        Ok(())
    }
}
