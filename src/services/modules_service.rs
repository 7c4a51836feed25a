use crate::db::models::{ModuleDraft, NewModule, TopicDraft};

/// Collaborator that turns inbound module payloads into the ordered drafts a
/// training aggregate is persisted with.
pub trait ModulesService: Send + Sync {
    fn assemble(&self, modules: Vec<NewModule>) -> Vec<ModuleDraft>;
}

pub struct DefaultModulesService;

impl ModulesService for DefaultModulesService {
    fn assemble(&self, modules: Vec<NewModule>) -> Vec<ModuleDraft> {
        modules
            .into_iter()
            .enumerate()
            .map(|(index, module)| ModuleDraft {
                name: module.name,
                position: index as i64,
                topics: module
                    .topics
                    .into_iter()
                    .enumerate()
                    .map(|(index, topic)| TopicDraft {
                        name: topic.name,
                        position: index as i64,
                    })
                    .collect(),
            })
            .collect()
    }
}
