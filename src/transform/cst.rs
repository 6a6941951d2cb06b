//! Rowan syntax trees as foreign trees.
//!
//! Any lossless CST built with rowan can be fed to the [`Transformer`](super::Transformer)
//! through [`RowanNode`]. The runtime type of a node is the `Debug` rendering
//! of its kind, so factories register against kind names such as `"CLASS_DEF"`.
//!
//! Accessors understood by [`RowanNode::get`](crate::model::ForeignNode::get):
//!
//! | accessor   | result                                                    |
//! |------------|-----------------------------------------------------------|
//! | `text`     | the node's source text                                    |
//! | `children` | every child node                                          |
//! | `KIND`     | first child node of that kind, else the text of the first token of that kind |
//! | `KIND*`    | every child node of that kind                             |

use std::fmt;
use std::rc::Rc;

use rowan::{Language, NodeOrToken, SyntaxNode};
use smol_str::SmolStr;

use crate::base::{LineIndex, Span};
use crate::model::{ForeignNode, ForeignRef, ForeignValue, Value};

pub struct RowanNode<L: Language> {
    syntax: SyntaxNode<L>,
    index: Rc<LineIndex>,
}

impl<L: Language + 'static> RowanNode<L> {
    /// Wrap the root of a tree parsed from `text`.
    pub fn root(syntax: SyntaxNode<L>, text: &str) -> ForeignRef {
        Self::new(syntax, Rc::new(LineIndex::new(text)))
    }

    pub fn new(syntax: SyntaxNode<L>, index: Rc<LineIndex>) -> ForeignRef {
        Rc::new(Self { syntax, index })
    }

    pub fn syntax(&self) -> &SyntaxNode<L> {
        &self.syntax
    }

    fn wrap(&self, syntax: SyntaxNode<L>) -> ForeignValue {
        ForeignValue::Node(Self::new(syntax, Rc::clone(&self.index)))
    }

    fn kind_name(kind: L::Kind) -> SmolStr {
        smol_str::format_smolstr!("{kind:?}")
    }

    fn children_of_kind(&self, kind: &str) -> ForeignValue {
        ForeignValue::List(
            self.syntax
                .children()
                .filter(|child| Self::kind_name(child.kind()) == kind)
                .map(|child| self.wrap(child))
                .collect(),
        )
    }

    fn first_of_kind(&self, kind: &str) -> ForeignValue {
        if let Some(child) = self
            .syntax
            .children()
            .find(|child| Self::kind_name(child.kind()) == kind)
        {
            return self.wrap(child);
        }
        self.syntax
            .children_with_tokens()
            .find_map(|element| match element {
                NodeOrToken::Token(token) if Self::kind_name(token.kind()) == kind => {
                    Some(ForeignValue::Value(Value::from(token.text())))
                }
                _ => None,
            })
            .unwrap_or(ForeignValue::Null)
    }
}

impl<L: Language + 'static> ForeignNode for RowanNode<L> {
    fn type_name(&self) -> SmolStr {
        Self::kind_name(self.syntax.kind())
    }

    fn get(&self, accessor: &str) -> ForeignValue {
        match accessor {
            "text" => ForeignValue::Value(Value::from(self.syntax.text().to_string())),
            "children" => ForeignValue::List(
                self.syntax
                    .children()
                    .map(|child| self.wrap(child))
                    .collect(),
            ),
            _ => match accessor.strip_suffix('*') {
                Some(kind) => self.children_of_kind(kind),
                None => self.first_of_kind(accessor),
            },
        }
    }

    fn range(&self) -> Option<Span> {
        Some(self.index.span(self.syntax.text_range()))
    }

    fn text(&self) -> Option<String> {
        Some(self.syntax.text().to_string())
    }
}

impl<L: Language> fmt::Debug for RowanNode<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RowanNode({:?}@{:?})", self.syntax.kind(), self.syntax.text_range())
    }
}
