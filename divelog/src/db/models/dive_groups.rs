//! Dive group aggregate used to persist its divers in one pass.

use serde::Serialize;

use crate::{
    db::models::divers::{DiverDBResponse, DiverUpdateDBRequest},
    types::{DiveGroupId, DiverId},
};

/// A diver as held by a dive group: `id` is `None` until the diver has been inserted.
/// The group owns membership, so `diver.dive_group_id` is overwritten with the group's id on sync.
#[derive(Debug, Clone)]
pub struct DiveGroupDiver {
    pub id: Option<DiverId>,
    pub diver: DiverUpdateDBRequest,
}

impl DiveGroupDiver {
    /// A diver that has never been persisted
    pub fn new(diver: DiverUpdateDBRequest) -> Self {
        Self { id: None, diver }
    }
}

impl From<DiverDBResponse> for DiveGroupDiver {
    fn from(diver: DiverDBResponse) -> Self {
        Self {
            id: Some(diver.id),
            diver: diver.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct DiveGroup {
    pub id: DiveGroupId,
    pub divers: Vec<DiveGroupDiver>,
}

impl DiveGroup {
    /// Ids of the members that already exist in the database
    pub fn persisted_ids(&self) -> Vec<DiverId> {
        self.divers.iter().filter_map(|d| d.id).collect()
    }

    /// The members, each assigned to this group whatever dive group its request named
    pub fn members(&self) -> impl Iterator<Item = DiveGroupDiver> + '_ {
        self.divers.iter().map(|member| DiveGroupDiver {
            id: member.id,
            diver: DiverUpdateDBRequest {
                dive_group_id: Some(self.id),
                ..member.diver.clone()
            },
        })
    }
}

/// Outcome of writing a dive group's divers back to the database
#[derive(Debug, Clone, Serialize)]
pub struct DiveGroupSync {
    pub dive_group_id: DiveGroupId,
    /// The group's divers as persisted, in the order they were given
    pub divers: Vec<DiverDBResponse>,
    pub deleted: u64,
    pub updated: usize,
    pub inserted: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_persisted_ids_skip_new_divers() {
        let group = DiveGroup {
            id: 4,
            divers: vec![
                DiveGroupDiver {
                    id: Some(10),
                    diver: DiverUpdateDBRequest::default(),
                },
                DiveGroupDiver::new(DiverUpdateDBRequest::default()),
                DiveGroupDiver {
                    id: Some(12),
                    diver: DiverUpdateDBRequest::default(),
                },
            ],
        };
        assert_eq!(group.persisted_ids(), vec![10, 12]);
    }

    #[test]
    fn test_members_belong_to_the_group() {
        let group = DiveGroup {
            id: 4,
            divers: vec![
                DiveGroupDiver {
                    id: Some(10),
                    diver: DiverUpdateDBRequest {
                        dive_group_id: Some(7),
                        ..Default::default()
                    },
                },
                DiveGroupDiver::new(DiverUpdateDBRequest::default()),
            ],
        };

        let members: Vec<_> = group.members().collect();
        assert_eq!(members.len(), 2);
        assert_eq!(members[0].id, Some(10));
        assert_eq!(members[1].id, None);
        assert!(members.iter().all(|m| m.diver.dive_group_id == Some(4)));
        // The aggregate itself is left as given
        assert_eq!(group.divers[0].diver.dive_group_id, Some(7));
    }
}
