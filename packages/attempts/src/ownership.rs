use common::{Owner, Submission, Viewer};

/// True if `viewer` authored the attempt, alone or as a team member.
pub fn is_owner(viewer: &Viewer, submission: &Submission) -> bool {
    owns(viewer, &submission.owner)
}

pub fn owns(viewer: &Viewer, owner: &Owner) -> bool {
    let Some(username) = viewer.username.as_deref() else {
        return false;
    };
    match owner {
        Owner::User { username: author } => author == username,
        Owner::Team { members, .. } => members.contains(username),
    }
}

/// Whether source code and the full verdict log may be requested for this attempt.
pub fn may_view_detail(viewer: &Viewer, submission: &Submission) -> bool {
    submission.can_view || is_owner(viewer, submission)
}
