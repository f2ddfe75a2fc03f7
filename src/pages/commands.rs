use tauri::State;

use crate::{
    pages::{GalleryView, MessageView},
    shell::AppState,
};

#[tauri::command]
pub async fn open_curtains(state: State<'_, AppState>) -> Result<MessageView, String> {
    Ok(state.app.message().open_curtains().await)
}

#[tauri::command]
pub async fn message_key(state: State<'_, AppState>, key: String) -> Result<MessageView, String> {
    Ok(state.app.message().handle_key(&key).await)
}

#[tauri::command]
pub async fn gallery_open(state: State<'_, AppState>, index: usize) -> Result<GalleryView, String> {
    Ok(state.app.gallery().open(index).await)
}

#[tauri::command]
pub async fn gallery_close(state: State<'_, AppState>) -> Result<GalleryView, String> {
    Ok(state.app.gallery().close().await)
}

#[tauri::command]
pub async fn gallery_next(state: State<'_, AppState>) -> Result<GalleryView, String> {
    Ok(state.app.gallery().next().await)
}

#[tauri::command]
pub async fn gallery_prev(state: State<'_, AppState>) -> Result<GalleryView, String> {
    Ok(state.app.gallery().prev().await)
}

#[tauri::command]
pub async fn gallery_key(state: State<'_, AppState>, key: String) -> Result<GalleryView, String> {
    Ok(state.app.gallery().handle_key(&key).await)
}
