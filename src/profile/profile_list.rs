// ssprs-profile/src/profile/profile_list.rs

use super::errors::ProfileError;
use super::profile::Profile;

/// Casts loaded from one source, with a cursor on the one being edited.
#[derive(Clone, Debug, Default)]
pub struct ProfileList {
    profiles: Vec<Profile>,
    current_index: usize,
}

impl ProfileList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, profile: Profile) {
        self.profiles.push(profile);
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn current(&self) -> Option<&Profile> {
        self.profiles.get(self.current_index)
    }

    pub fn current_mut(&mut self) -> Option<&mut Profile> {
        self.profiles.get_mut(self.current_index)
    }

    pub fn set_current(&mut self, idx: usize) -> Result<(), ProfileError> {
        if idx >= self.profiles.len() {
            return Err(ProfileError::IndexOutOfRange(idx, self.profiles.len()));
        }
        self.current_index = idx;
        Ok(())
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Profile> {
        self.profiles.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Profile> {
        self.profiles.iter_mut()
    }

    /// Remove the profile at `idx`, keeping the cursor on a valid entry.
    pub fn remove(&mut self, idx: usize) -> Result<Profile, ProfileError> {
        if idx >= self.profiles.len() {
            return Err(ProfileError::IndexOutOfRange(idx, self.profiles.len()));
        }
        let removed = self.profiles.remove(idx);
        if self.current_index > idx || self.current_index >= self.profiles.len() {
            self.current_index = self.current_index.saturating_sub(1);
        }
        Ok(removed)
    }

    pub fn clear(&mut self) {
        self.profiles.clear();
        self.current_index = 0;
    }

    pub fn into_vec(self) -> Vec<Profile> {
        self.profiles
    }
}

impl From<Vec<Profile>> for ProfileList {
    fn from(profiles: Vec<Profile>) -> Self {
        Self {
            profiles,
            current_index: 0,
        }
    }
}

impl<'a> IntoIterator for &'a ProfileList {
    type Item = &'a Profile;
    type IntoIter = std::slice::Iter<'a, Profile>;

    fn into_iter(self) -> Self::IntoIter {
        self.profiles.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list_of(n: usize) -> ProfileList {
        (0..n)
            .map(|i| {
                let mut p = Profile::new();
                p.init_data(i + 1);
                p
            })
            .collect::<Vec<_>>()
            .into()
    }

    #[test]
    fn test_cursor() {
        let mut list = list_of(3);
        assert_eq!(list.current().unwrap().data.num_samples(), 1);
        list.set_current(2).unwrap();
        assert_eq!(list.current().unwrap().data.num_samples(), 3);
        assert!(matches!(
            list.set_current(3),
            Err(ProfileError::IndexOutOfRange(3, 3))
        ));
    }

    #[test]
    fn test_remove_keeps_cursor_valid() {
        let mut list = list_of(3);
        list.set_current(2).unwrap();
        list.remove(2).unwrap();
        assert_eq!(list.current_index(), 1);
        list.set_current(1).unwrap();
        list.remove(0).unwrap();
        assert_eq!(list.current_index(), 0);
        assert_eq!(list.current().unwrap().data.num_samples(), 2);
        list.clear();
        assert!(list.current().is_none());
    }
}
