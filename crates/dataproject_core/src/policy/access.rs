//! Principal-to-project access predicates.

use crate::model::data_project::DataProject;
use crate::model::principal::Principal;

/// Decides whether a principal may see or change a data project.
///
/// Implementations must be pure functions of their inputs.
pub trait AccessPolicy {
    fn can_view(&self, principal: &Principal, project: &DataProject) -> bool;

    /// Defaults to visibility; there are no distinct roles in core.
    fn can_mutate(&self, principal: &Principal, project: &DataProject) -> bool {
        self.can_view(principal, project)
    }
}

/// Visibility equals ownership.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OwnerOnlyPolicy;

impl AccessPolicy for OwnerOnlyPolicy {
    fn can_view(&self, principal: &Principal, project: &DataProject) -> bool {
        project.is_owned_by(principal.person_id)
    }
}

impl<P: AccessPolicy + ?Sized> AccessPolicy for &P {
    fn can_view(&self, principal: &Principal, project: &DataProject) -> bool {
        (**self).can_view(principal, project)
    }

    fn can_mutate(&self, principal: &Principal, project: &DataProject) -> bool {
        (**self).can_mutate(principal, project)
    }
}
