// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::errors::ChainError;
use crate::plugins::Plugin;
use crate::traits::Processor;

/// A named processor in the chain.
///
/// Whether the processor can modify events is checked once, when the member
/// is built, and cached.
pub struct ChainMember {
    name: String,
    type_name: String,
    is_modifier: bool,
    processor: Plugin<Box<dyn Processor>>,
}

impl ChainMember {
    pub fn new(name: &str, mut processor: Plugin<Box<dyn Processor>>) -> Self {
        let type_name = processor.type_name().to_string();
        let is_modifier = processor.as_event_modifier().is_some();
        Self {
            name: name.to_string(),
            type_name,
            is_modifier,
            processor,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn is_modifier(&self) -> bool {
        self.is_modifier
    }

    pub fn processor(&self) -> &dyn Processor {
        &**self.processor
    }

    pub fn processor_mut(&mut self) -> &mut dyn Processor {
        &mut **self.processor
    }
}

impl std::fmt::Debug for ChainMember {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChainMember")
            .field("name", &self.name)
            .field("type_name", &self.type_name)
            .field("is_modifier", &self.is_modifier)
            .finish()
    }
}

/// Ordered, name-addressable list of processors.
#[derive(Debug, Default)]
pub struct ProcessorChain {
    members: Vec<ChainMember>,
}

impl ProcessorChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, member: ChainMember) -> Result<(), ChainError> {
        self.ensure_absent(&member.name)?;
        self.members.push(member);
        Ok(())
    }

    /// Insert at `index`; `index == len()` appends.
    pub fn insert_at(&mut self, index: usize, member: ChainMember) -> Result<(), ChainError> {
        if index > self.members.len() {
            return Err(ChainError::IndexOutOfRange {
                index,
                len: self.members.len(),
            });
        }
        self.ensure_absent(&member.name)?;
        self.members.insert(index, member);
        Ok(())
    }

    pub fn insert_before(&mut self, anchor: &str, member: ChainMember) -> Result<(), ChainError> {
        let index = self.require(anchor)?;
        self.insert_at(index, member)
    }

    pub fn insert_after(&mut self, anchor: &str, member: ChainMember) -> Result<(), ChainError> {
        let index = self.require(anchor)?;
        self.insert_at(index + 1, member)
    }

    pub fn remove(&mut self, name: &str) -> Result<ChainMember, ChainError> {
        let index = self.require(name)?;
        Ok(self.members.remove(index))
    }

    pub fn remove_at(&mut self, index: usize) -> Result<ChainMember, ChainError> {
        if index >= self.members.len() {
            return Err(ChainError::IndexOutOfRange {
                index,
                len: self.members.len(),
            });
        }
        Ok(self.members.remove(index))
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.members.iter().position(|m| m.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    pub fn get(&self, name: &str) -> Option<&ChainMember> {
        self.members.iter().find(|m| m.name == name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut ChainMember> {
        self.members.iter_mut().find(|m| m.name == name)
    }

    pub fn member_at(&self, index: usize) -> Option<&ChainMember> {
        self.members.get(index)
    }

    pub fn member_at_mut(&mut self, index: usize) -> Option<&mut ChainMember> {
        self.members.get_mut(index)
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &ChainMember> {
        self.members.iter()
    }

    pub fn iter_mut(&mut self) -> impl DoubleEndedIterator<Item = &mut ChainMember> {
        self.members.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn names(&self) -> Vec<&str> {
        self.members.iter().map(|m| m.name.as_str()).collect()
    }

    /// Names of the event modifiers, in chain order
    pub fn modifier_names(&self) -> Vec<&str> {
        self.members
            .iter()
            .filter(|m| m.is_modifier)
            .map(|m| m.name.as_str())
            .collect()
    }

    fn require(&self, name: &str) -> Result<usize, ChainError> {
        self.position(name)
            .ok_or_else(|| ChainError::UnknownMember(name.to_string()))
    }

    fn ensure_absent(&self, name: &str) -> Result<(), ChainError> {
        if self.contains(name) {
            Err(ChainError::DuplicateMember(name.to_string()))
        } else {
            Ok(())
        }
    }
}
