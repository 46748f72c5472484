use super::{Store, StoreError};

/* Per-user todo lists. Items are numbered from 1 in the order they were
 * added; completing flips the done flag and nothing is ever removed.
 */

#[derive(Clone, Debug, PartialEq)]
pub struct TodoItem {
    pub text: String,
    pub done: bool,
}

impl Store {
    // Appends an item and returns its 1-based number.
    pub async fn add_todo(&self, user_id: u64, text: String) -> usize {
        let mut todos = self.todos.lock().await;
        let list = todos.entry(user_id).or_default();
        list.push(TodoItem { text, done: false });
        list.len()
    }

    pub async fn todos(&self, user_id: u64) -> Vec<TodoItem> {
        self.todos
            .lock()
            .await
            .get(&user_id)
            .cloned()
            .unwrap_or_default()
    }

    // Marks the item with the given 1-based number as done.
    pub async fn complete_todo(&self, user_id: u64, number: usize) -> Result<String, StoreError> {
        let mut todos = self.todos.lock().await;
        let item = todos
            .get_mut(&user_id)
            .and_then(|list| number.checked_sub(1).and_then(|i| list.get_mut(i)))
            .ok_or(StoreError::TodoNotFound(number))?;

        if item.done {
            return Err(StoreError::TodoAlreadyDone(number));
        }
        item.done = true;
        Ok(item.text.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_add_list_complete() {
        let store = Store::new();

        assert_eq!(store.add_todo(9, "water plants".to_string()).await, 1);
        assert_eq!(store.add_todo(9, "fix bike".to_string()).await, 2);

        let completed = store.complete_todo(9, 1).await.unwrap();
        assert_eq!(completed, "water plants");

        let items = store.todos(9).await;
        assert_eq!(items.len(), 2);
        assert!(items[0].done);
        assert!(!items[1].done);
    }

    #[tokio::test]
    async fn test_complete_rejects_bad_numbers() {
        let store = Store::new();
        store.add_todo(9, "only item".to_string()).await;

        assert_eq!(
            store.complete_todo(9, 0).await,
            Err(StoreError::TodoNotFound(0))
        );
        assert_eq!(
            store.complete_todo(9, 2).await,
            Err(StoreError::TodoNotFound(2))
        );
        assert_eq!(
            store.complete_todo(8, 1).await,
            Err(StoreError::TodoNotFound(1))
        );

        store.complete_todo(9, 1).await.unwrap();
        assert_eq!(
            store.complete_todo(9, 1).await,
            Err(StoreError::TodoAlreadyDone(1))
        );
    }
}
